use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use sea_orm::{Database, DatabaseConnection};

use super::{
    pool_options,
    registry::{DbProvider, DbProviderId},
};
use crate::config::DatabaseConfig;

const SQLITE_BUSY_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SqliteDbProvider;

#[async_trait]
impl DbProvider for SqliteDbProvider {
    fn id(&self) -> DbProviderId {
        DbProviderId::Sqlite
    }

    fn supports_url(&self, url: &str) -> bool {
        url.trim().to_ascii_lowercase().starts_with("sqlite:")
    }

    // Set on every pooled connection.
    async fn connect(&self, cfg: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut options = pool_options(cfg);
        options.map_sqlx_sqlite_opts(|opts| opts.busy_timeout(SQLITE_BUSY_TIMEOUT));
        Ok(Database::connect(options).await?)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ConnectionTrait, DbBackend, Statement};

    use super::*;

    #[tokio::test]
    async fn every_pooled_connection_gets_the_busy_timeout() {
        let cfg = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 2,
            min_idle: 2,
        };
        let db = SqliteDbProvider
            .connect(&cfg)
            .await
            .expect("in-memory sqlite should connect");

        let (first, second) = tokio::join!(busy_timeout_ms(&db), busy_timeout_ms(&db));

        assert_eq!(first, 10_000);
        assert_eq!(second, 10_000);
    }

    async fn busy_timeout_ms(db: &DatabaseConnection) -> i64 {
        let row = db
            .query_one_raw(Statement::from_string(DbBackend::Sqlite, "PRAGMA busy_timeout"))
            .await
            .expect("pragma should run")
            .expect("pragma should return a row");
        row.try_get_by_index::<i64>(0)
            .expect("timeout should be an integer")
    }
}
