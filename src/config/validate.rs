use anyhow::{Result, bail};
use axum::http::{HeaderName, HeaderValue, Method};

use super::{AppConfig, CorsMode};
use crate::db::providers;

pub fn validate(cfg: &AppConfig) -> Result<()> {
    let mut errors: Vec<String> = Vec::new();

    if cfg.general.host.trim().is_empty() {
        errors.push("general.host must not be empty".to_string());
    }

    let database = &cfg.database;
    if database.url.trim().is_empty() {
        errors.push("database.url must not be empty".to_string());
    } else if !providers::is_supported_url(&database.url) {
        errors.push(
            "database.url must use one of the schemes postgres://, postgresql://, sqlite:"
                .to_string(),
        );
    }

    if database.max_connections == 0 {
        errors.push("database.max_connections must be > 0".to_string());
    }

    if database.min_idle > database.max_connections {
        errors.push(format!(
            "database.min_idle ({}) must be <= database.max_connections ({})",
            database.min_idle, database.max_connections
        ));
    }

    let cors = &cfg.cors;
    if cors.mode == CorsMode::Origins && cors.allowed_origins.is_empty() {
        errors.push("cors.allowed_origins must list at least one origin in origins mode".to_string());
    }

    for origin in &cors.allowed_origins {
        if origin == "*" || HeaderValue::from_str(origin).is_err() {
            errors.push(format!("cors.allowed_origins contains an invalid origin: {origin}"));
        }
    }

    for method in &cors.allowed_methods {
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(format!("cors.allowed_methods contains an invalid method: {method}"));
        }
    }

    for header in &cors.allowed_headers {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(format!("cors.allowed_headers contains an invalid header: {header}"));
        }
    }

    if cfg.api.routes.is_empty() {
        errors.push("api.routes must enable at least one route".to_string());
    }

    if errors.is_empty() {
        return Ok(());
    }

    bail!("invalid app config:\n- {}", errors.join("\n- "))
}
