use uuid::Uuid;

use crate::db::dao::DaoLayerError;
use crate::error::{AppError, ErrorDetail};

/// Client-facing messages for each operation of a resource.
#[derive(Clone, Copy)]
pub struct CrudErrors {
    pub resource: &'static str,
    pub create_failed: &'static str,
    pub find_failed: &'static str,
    pub update_failed: &'static str,
    pub delete_failed: &'static str,
}

impl CrudErrors {
    pub fn not_found(&self, id: &str) -> String {
        format!("{} with id: {id} not found", self.resource)
    }

    pub fn deleted(&self, id: &str) -> String {
        format!("{} with id: {id} deleted", self.resource)
    }

    pub fn failed(&self, op: CrudOp) -> &'static str {
        match op {
            CrudOp::Create => self.create_failed,
            CrudOp::Find | CrudOp::List => self.find_failed,
            CrudOp::Update => self.update_failed,
            CrudOp::Delete => self.delete_failed,
        }
    }
}

impl Default for CrudErrors {
    fn default() -> Self {
        Self {
            resource: "Resource",
            create_failed: "Create failed",
            find_failed: "Find failed",
            update_failed: "Update failed",
            delete_failed: "Delete failed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CrudOp {
    Create,
    Find,
    List,
    Update,
    Delete,
}

impl CrudOp {
    pub fn as_str(self) -> &'static str {
        match self {
            CrudOp::Create => "create",
            CrudOp::Find => "find",
            CrudOp::List => "list",
            CrudOp::Update => "update",
            CrudOp::Delete => "delete",
        }
    }
}

pub trait CrudService {
    fn errors(&self) -> CrudErrors {
        CrudErrors::default()
    }

    /// Converts a store failure into the response for `op`. `id` is the
    /// identifier exactly as the client sent it.
    fn map_error(&self, op: CrudOp, id: Option<&str>, err: DaoLayerError) -> AppError {
        let errors = self.errors();
        match err {
            DaoLayerError::NotFound { .. } => {
                let id = id.unwrap_or_default();
                tracing::debug!(op = op.as_str(), id, "{} not found", errors.resource);
                AppError::not_found(errors.not_found(id))
            }
            DaoLayerError::Db(db_err) => {
                tracing::error!(
                    op = op.as_str(),
                    id = id.unwrap_or_default(),
                    error = %db_err,
                    "{} store operation failed",
                    errors.resource
                );
                AppError::failed(errors.failed(op), ErrorDetail::database(db_err.to_string()))
            }
        }
    }

    /// Rejects an identifier that cannot address a record.
    fn parse_id(&self, op: CrudOp, id: &str) -> Result<Uuid, AppError> {
        Uuid::parse_str(id).map_err(|err| {
            AppError::failed(
                self.errors().failed(op),
                ErrorDetail::cast(format!("Cast to Uuid failed for value \"{id}\": {err}")),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use sea_orm::DbErr;
    use uuid::Uuid;

    use super::{CrudErrors, CrudOp, CrudService};
    use crate::db::dao::DaoLayerError;
    use crate::error::ErrorKind;

    struct Widgets;

    impl CrudService for Widgets {
        fn errors(&self) -> CrudErrors {
            CrudErrors {
                resource: "Widget",
                ..CrudErrors::default()
            }
        }
    }

    #[test]
    fn not_found_uses_the_client_supplied_id() {
        let err = Widgets.map_error(
            CrudOp::Find,
            Some("abc"),
            DaoLayerError::NotFound {
                entity: "widget",
                id: Uuid::nil(),
            },
        );

        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Widget with id: abc not found");
    }

    #[test]
    fn store_errors_keep_the_operation_message() {
        let err = Widgets.map_error(
            CrudOp::Delete,
            Some("abc"),
            DaoLayerError::Db(DbErr::Custom("pool timed out".to_string())),
        );

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Delete failed");
        let detail = err.detail().expect("detail should be present");
        assert_eq!(detail.name, ErrorKind::Database);
        assert!(detail.message.contains("pool timed out"));
    }

    #[test]
    fn malformed_ids_are_cast_errors() {
        let err = Widgets
            .parse_id(CrudOp::Update, "not-an-id")
            .expect_err("id should not parse");

        assert_eq!(err.message(), "Update failed");
        assert_eq!(err.detail().map(|detail| detail.name), Some(ErrorKind::Cast));
    }
}
