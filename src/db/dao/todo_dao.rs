use sea_orm::{DatabaseConnection, Set};
use uuid::Uuid;

use super::{DaoBase, DaoResult};
use crate::db::entities::{prelude::Todo, todo};

#[derive(Clone)]
pub struct TodoDao {
    db: DatabaseConnection,
}

impl DaoBase for TodoDao {
    type Entity = Todo;

    fn new(db: &DatabaseConnection) -> Self {
        Self { db: db.clone() }
    }

    fn db(&self) -> &DatabaseConnection {
        &self.db
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub title: String,
    pub description: String,
    pub timeline: String,
}

/// Fields to overwrite on an existing todo. `None` leaves the column as is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub timeline: Option<String>,
}

impl TodoPatch {
    pub fn apply(self, active: &mut todo::ActiveModel) {
        if let Some(title) = self.title {
            active.title = Set(title);
        }
        if let Some(description) = self.description {
            active.description = Set(description);
        }
        if let Some(timeline) = self.timeline {
            active.timeline = Set(timeline);
        }
    }
}

impl TodoDao {
    pub async fn create_todo(&self, new: NewTodo) -> DaoResult<todo::Model> {
        let model = todo::ActiveModel {
            title: Set(new.title),
            description: Set(new.description),
            timeline: Set(new.timeline),
            ..Default::default()
        };
        self.create(model).await
    }

    pub async fn list_todos(&self, limit: Option<u64>) -> DaoResult<Vec<todo::Model>> {
        self.find(limit, |query| query).await
    }

    pub async fn find_todo(&self, id: &Uuid) -> DaoResult<todo::Model> {
        self.find_by_id(*id).await
    }

    pub async fn update_todo(&self, id: &Uuid, patch: TodoPatch) -> DaoResult<todo::Model> {
        self.update(*id, move |active| patch.apply(active)).await
    }

    pub async fn delete_todo(&self, id: &Uuid) -> DaoResult<Uuid> {
        self.delete(*id).await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{FixedOffset, TimeZone};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use crate::db::entities::todo;

    use super::{NewTodo, TodoDao, TodoPatch};
    use crate::db::dao::{DaoBase, DaoLayerError};

    fn ts() -> chrono::DateTime<chrono::FixedOffset> {
        FixedOffset::east_opt(0)
            .expect("offset should be valid")
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .expect("timestamp should be valid")
    }

    fn todo_model(id: Uuid, title: &str, timeline: &str) -> todo::Model {
        let now = ts();
        todo::Model {
            id,
            title: title.to_string(),
            description: "write the report".to_string(),
            timeline: timeline.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn create_todo_returns_inserted_row() {
        let id = Uuid::now_v7();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([[todo_model(id, "report", "5 days")]])
            .into_connection();
        let dao = TodoDao::new(&db);

        let created = dao
            .create_todo(NewTodo {
                title: "report".to_string(),
                description: "write the report".to_string(),
                timeline: "5 days".to_string(),
            })
            .await
            .expect("insert should succeed");

        assert_eq!(created.id, id);
        assert_eq!(created.timeline, "5 days");
    }

    #[tokio::test]
    async fn find_todo_maps_missing_row_to_not_found() {
        let missing_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<todo::Model>::new()])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao.find_todo(&missing_id).await.expect_err("lookup should fail");
        assert!(matches!(
            err,
            DaoLayerError::NotFound { id, .. } if id == missing_id
        ));
    }

    #[tokio::test]
    async fn update_todo_propagates_not_found_before_writing() {
        let missing_id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<todo::Model>::new()])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao
            .update_todo(
                &missing_id,
                TodoPatch {
                    description: Some("new".to_string()),
                    ..TodoPatch::default()
                },
            )
            .await
            .expect_err("update should fail");
        assert!(matches!(err, DaoLayerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_todo_reports_not_found_when_nothing_was_removed() {
        let id = Uuid::new_v4();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao.delete_todo(&id).await.expect_err("delete should fail");
        assert!(matches!(err, DaoLayerError::NotFound { .. }));
    }

    #[tokio::test]
    async fn list_todos_maps_database_errors() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let dao = TodoDao::new(&db);

        let err = dao.list_todos(Some(2)).await.expect_err("list should fail");
        assert!(matches!(err, DaoLayerError::Db(_)));
    }

    #[test]
    fn patch_only_sets_supplied_fields() {
        let mut active = todo::ActiveModel::default();
        TodoPatch {
            description: Some("updated".to_string()),
            ..TodoPatch::default()
        }
        .apply(&mut active);

        assert_eq!(active.description, sea_orm::Set("updated".to_string()));
        assert!(active.title.is_not_set());
        assert!(active.timeline.is_not_set());
    }
}
