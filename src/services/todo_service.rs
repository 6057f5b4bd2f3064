use serde_json::{Map, Value};

use crate::{
    db::dao::{NewTodo, TodoDao, TodoPatch},
    db::entities::todo,
    error::{AppError, ErrorDetail},
    services::crud_service::{CrudErrors, CrudOp, CrudService},
};

pub const TIMELINE_SUFFIX: &str = " days";

const TODO_ERRORS: CrudErrors = CrudErrors {
    resource: "Todo",
    create_failed: "Error occured in creating the new todo",
    find_failed: "Error occured in fetching todos",
    update_failed: "Error occured in updating todo",
    delete_failed: "Error occured in deleting todo",
};

const TITLE: &str = "title";
const DESCRIPTION: &str = "description";
const TIMELINE: &str = "timeline";

/// Request fields, as decoded from a JSON object or a url-encoded form.
pub type TodoFields = Map<String, Value>;

#[derive(Clone)]
pub struct TodoService {
    todo_dao: TodoDao,
}

impl TodoService {
    pub fn new(todo_dao: TodoDao) -> Self {
        Self { todo_dao }
    }

    pub async fn create(&self, fields: &TodoFields) -> Result<todo::Model, AppError> {
        let new = new_todo_from_fields(fields)
            .map_err(|detail| AppError::failed(TODO_ERRORS.create_failed, detail))?;
        self.todo_dao
            .create_todo(new)
            .await
            .map_err(|err| self.map_error(CrudOp::Create, None, err))
    }

    pub async fn list(&self, limit: Option<u64>) -> Result<Vec<todo::Model>, AppError> {
        self.todo_dao
            .list_todos(limit)
            .await
            .map_err(|err| self.map_error(CrudOp::List, None, err))
    }

    pub async fn get(&self, id: &str) -> Result<todo::Model, AppError> {
        let uuid = self.parse_id(CrudOp::Find, id)?;
        self.todo_dao
            .find_todo(&uuid)
            .await
            .map_err(|err| self.map_error(CrudOp::Find, Some(id), err))
    }

    /// Merges `fields` into the stored todo and returns the new state. The
    /// timeline is stored exactly as supplied.
    pub async fn update(&self, id: &str, fields: &TodoFields) -> Result<todo::Model, AppError> {
        let uuid = self.parse_id(CrudOp::Update, id)?;
        let patch = patch_from_fields(fields)
            .map_err(|detail| AppError::failed(TODO_ERRORS.update_failed, detail))?;
        self.todo_dao
            .update_todo(&uuid, patch)
            .await
            .map_err(|err| self.map_error(CrudOp::Update, Some(id), err))
    }

    /// Removes the todo and returns the confirmation message.
    pub async fn delete(&self, id: &str) -> Result<String, AppError> {
        let uuid = self.parse_id(CrudOp::Delete, id)?;
        self.todo_dao
            .delete_todo(&uuid)
            .await
            .map_err(|err| self.map_error(CrudOp::Delete, Some(id), err))?;
        Ok(TODO_ERRORS.deleted(id))
    }
}

impl CrudService for TodoService {
    fn errors(&self) -> CrudErrors {
        TODO_ERRORS
    }
}

// The store binds limits as signed 64-bit integers.
const MAX_LIMIT: u64 = i64::MAX as u64;

/// Coerces a `limit` query value numerically, treating zero and non-numbers
/// as "no limit". Decimal, exponent and `0x`/`0o`/`0b` forms are accepted.
/// Negative limits count from their magnitude, and limits past what the
/// store can bind are capped.
pub fn parse_limit(raw: Option<&str>) -> Option<u64> {
    let value = raw?.trim();
    if value.is_empty() {
        return None;
    }

    let number = match radix_literal(value) {
        Some(number) => number?,
        None => value.parse::<f64>().ok()?,
    };
    if !number.is_finite() {
        return None;
    }

    let limit = number.abs().trunc();
    (limit >= 1.0).then(|| (limit as u64).min(MAX_LIMIT))
}

// `Some(None)` is a prefixed literal with bad digits.
fn radix_literal(value: &str) -> Option<Option<f64>> {
    let radix = match value.get(..2)?.to_ascii_lowercase().as_str() {
        "0x" => 16,
        "0o" => 8,
        "0b" => 2,
        _ => return None,
    };
    let digits = &value[2..];
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Some(None);
    }
    Some(Some(match u64::from_str_radix(digits, radix) {
        Ok(number) => number as f64,
        Err(_) => f64::MAX,
    }))
}

fn field_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn new_todo_from_fields(fields: &TodoFields) -> Result<NewTodo, ErrorDetail> {
    let mut problems = Vec::new();
    let mut required = |name: &str| match fields.get(name) {
        None | Some(Value::Null) => {
            problems.push(format!("{name} is required"));
            None
        }
        Some(value) => match field_text(value) {
            Some(text) if text.is_empty() => {
                problems.push(format!("{name} is required"));
                None
            }
            Some(text) => Some(text),
            None => {
                problems.push(format!("{name} must be text"));
                None
            }
        },
    };

    let title = required(TITLE);
    let description = required(DESCRIPTION);
    let timeline = required(TIMELINE);

    match (title, description, timeline) {
        (Some(title), Some(description), Some(timeline)) => Ok(NewTodo {
            title,
            description,
            timeline: format!("{timeline}{TIMELINE_SUFFIX}"),
        }),
        _ => Err(validation_failed(&problems)),
    }
}

fn patch_from_fields(fields: &TodoFields) -> Result<TodoPatch, ErrorDetail> {
    let mut problems = Vec::new();
    let mut optional = |name: &str| {
        let value = fields.get(name)?;
        let text = field_text(value);
        if text.is_none() {
            problems.push(format!("{name} must be text"));
        }
        text
    };

    let patch = TodoPatch {
        title: optional(TITLE),
        description: optional(DESCRIPTION),
        timeline: optional(TIMELINE),
    };

    if problems.is_empty() {
        Ok(patch)
    } else {
        Err(validation_failed(&problems))
    }
}

fn validation_failed(problems: &[String]) -> ErrorDetail {
    ErrorDetail::validation(format!("todo validation failed: {}", problems.join(", ")))
}
