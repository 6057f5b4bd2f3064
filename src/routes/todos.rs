use std::sync::Arc;

use axum::{
    Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::MethodRouter,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    config::{ApiConfig, TodoRoute},
    db::entities::todo,
    response::{ApiResponse, ApiResult, MessageBody},
    routes::payload::Payload,
    services::{ServiceContext, todo_service, todo_service::parse_limit},
    state::AppState,
};

const COLLECTION_PATH: &str = "/todos";
const COLLECTION_PATH_SLASH: &str = "/todos/";
const ITEM_PATH: &str = "/todos/{id}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoResponse {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub timeline: String,
}

/// Builds the todo routes enabled in `api`. Paths with no enabled method are
/// left unregistered.
pub fn router(api: &ApiConfig) -> Router<Arc<AppState>> {
    let mut collection: MethodRouter<Arc<AppState>> = MethodRouter::new();
    let mut collection_used = false;
    if api.is_enabled(TodoRoute::Create) {
        collection = collection.post(create_todo);
        collection_used = true;
    }
    if api.is_enabled(TodoRoute::List) {
        collection = collection.get(list_todos);
        collection_used = true;
    }

    let mut item: MethodRouter<Arc<AppState>> = MethodRouter::new();
    let mut item_used = false;
    if api.is_enabled(TodoRoute::Get) {
        item = item.get(get_todo);
        item_used = true;
    }
    if api.is_enabled(TodoRoute::Update) {
        item = item.put(update_todo);
        item_used = true;
    }
    if api.is_enabled(TodoRoute::Delete) {
        item = item.delete(delete_todo);
        item_used = true;
    }

    let mut router = Router::new();
    if collection_used {
        router = router
            .route(COLLECTION_PATH, collection.clone())
            .route(COLLECTION_PATH_SLASH, collection);
    }
    if item_used {
        router = router.route(ITEM_PATH, item);
    }
    router
}

async fn create_todo(
    State(state): State<Arc<AppState>>,
    Payload(fields): Payload,
) -> ApiResult<TodoResponse> {
    let service = todo_service_from_state(state.as_ref());
    let todo = service.create(&fields).await.map_err(|err| {
        if state.config.api.legacy_create_error_status {
            err.with_failure_status(StatusCode::OK)
        } else {
            err
        }
    })?;
    ApiResponse::ok(todo.into())
}

async fn list_todos(
    State(state): State<Arc<AppState>>,
    Query(query): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<TodoResponse>> {
    let service = todo_service_from_state(state.as_ref());
    let todos = service.list(limit_from_query(&query)).await?;
    ApiResponse::ok(todos.into_iter().map(TodoResponse::from).collect())
}

async fn get_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<TodoResponse> {
    let service = todo_service_from_state(state.as_ref());
    let todo = service.get(&id).await?;
    ApiResponse::ok(todo.into())
}

async fn update_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Payload(fields): Payload,
) -> ApiResult<TodoResponse> {
    let service = todo_service_from_state(state.as_ref());
    let todo = service.update(&id, &fields).await?;
    ApiResponse::ok(todo.into())
}

async fn delete_todo(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<MessageBody> {
    let service = todo_service_from_state(state.as_ref());
    let message = service.delete(&id).await?;
    ApiResponse::ok(MessageBody::new(message))
}

// A repeated `limit` key is not a number, so it lifts the limit entirely.
fn limit_from_query(query: &[(String, String)]) -> Option<u64> {
    let mut values = query.iter().filter(|(key, _)| key == "limit");
    match (values.next(), values.next()) {
        (Some((_, value)), None) => parse_limit(Some(value.as_str())),
        _ => None,
    }
}

impl From<todo::Model> for TodoResponse {
    fn from(model: todo::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            description: model.description,
            timeline: model.timeline,
        }
    }
}

fn todo_service_from_state(state: &AppState) -> todo_service::TodoService {
    ServiceContext::from_state(state).todo()
}
