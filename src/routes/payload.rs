use axum::{
    Form, Json,
    extract::{FromRequest, Request},
    http::header,
};
use serde_json::Value;

use crate::{error::AppError, services::todo_service::TodoFields};

/// Request body fields from either a JSON object or a url-encoded form.
/// Bodies of any other content type read as empty.
#[derive(Debug, Default)]
pub struct Payload(pub TodoFields);

enum BodyKind {
    Json,
    Form,
    Other,
}

fn body_kind(req: &Request) -> BodyKind {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    if content_type.starts_with("application/json") || content_type.contains("+json") {
        BodyKind::Json
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        BodyKind::Form
    } else {
        BodyKind::Other
    }
}

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match body_kind(&req) {
            BodyKind::Json => {
                let Json(value) = Json::<Value>::from_request(req, state)
                    .await
                    .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
                Ok(match value {
                    Value::Object(fields) => Self(fields),
                    _ => Self::default(),
                })
            }
            BodyKind::Form => {
                let Form(pairs) = Form::<Vec<(String, String)>>::from_request(req, state)
                    .await
                    .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
                Ok(Self(form_fields(pairs)))
            }
            BodyKind::Other => Ok(Self::default()),
        }
    }
}

// A key sent more than once becomes an array of its values, which no todo
// field accepts.
fn form_fields(pairs: Vec<(String, String)>) -> TodoFields {
    let mut fields = TodoFields::new();
    for (key, value) in pairs {
        let value = Value::String(value);
        match fields.get_mut(&key) {
            Some(Value::Array(values)) => values.push(value),
            Some(existing) => *existing = Value::Array(vec![existing.take(), value]),
            None => {
                fields.insert(key, value);
            }
        }
    }
    fields
}
