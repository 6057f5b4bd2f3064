use axum::Router;
use sea_orm::{DatabaseBackend, MockDatabase};

use crate::{
    config::{AppConfig, DatabaseConfig},
    db::connection,
    routes::app,
    state::AppState,
};

/// Defaults with a private in-memory SQLite store. One connection keeps every
/// request on the same database.
pub fn test_config() -> AppConfig {
    AppConfig {
        database: DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_idle: 1,
        },
        ..AppConfig::default()
    }
}

pub async fn sqlite_router(cfg: AppConfig) -> Router {
    let db = connection::connect(&cfg.database)
        .await
        .expect("connect to in-memory sqlite");
    app(AppState::new(cfg, db)).expect("build app")
}

/// A router whose store rejects every statement.
pub fn failing_router(cfg: AppConfig) -> Router {
    let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    app(AppState::new(cfg, db)).expect("build app")
}
