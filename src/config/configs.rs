use std::{fmt, str::FromStr};

use anyhow::Result;
use serde::{Deserialize, Deserializer, Serialize};

use super::{defaults, envconfig::EnvConfig, validate};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub database: DatabaseConfig,
    pub cors: CorsConfig,
    pub api: ApiConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        <Self as EnvConfig>::from_env()
    }
}

impl EnvConfig for AppConfig {
    // Bare variables honoured for deployments that predate the APP_ prefix.
    const ENV_ALIASES: &'static [(&'static str, &'static str)] =
        &[("PORT", "general.port"), ("DATABASE_URL", "database.url")];

    fn validate(&self) -> Result<()> {
        validate::validate(self)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneralConfig {
    pub host: String,
    pub port: u16,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            host: defaults::DEFAULT_HOST.to_string(),
            port: defaults::DEFAULT_PORT,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    pub rust_log: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log: defaults::DEFAULT_RUST_LOG.to_string(),
            format: LogFormat::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_idle: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: defaults::DEFAULT_DATABASE_URL.to_string(),
            max_connections: defaults::DEFAULT_DB_MAX_CONNECTIONS,
            min_idle: defaults::DEFAULT_DB_MIN_IDLE,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CorsMode {
    /// Any origin, method and header.
    #[default]
    Any,
    /// Only `allowed_origins`, restricted to the configured methods and headers.
    Origins,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    pub mode: CorsMode,
    #[serde(deserialize_with = "comma_list")]
    pub allowed_origins: Vec<String>,
    #[serde(deserialize_with = "comma_list")]
    pub allowed_methods: Vec<String>,
    #[serde(deserialize_with = "comma_list")]
    pub allowed_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            mode: CorsMode::default(),
            allowed_origins: Vec::new(),
            allowed_methods: to_strings(defaults::DEFAULT_CORS_METHODS),
            allowed_headers: to_strings(defaults::DEFAULT_CORS_HEADERS),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TodoRoute {
    Create,
    List,
    Get,
    Update,
    Delete,
}

impl TodoRoute {
    pub const ALL: [TodoRoute; 5] = [
        TodoRoute::Create,
        TodoRoute::List,
        TodoRoute::Get,
        TodoRoute::Update,
        TodoRoute::Delete,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TodoRoute::Create => "create",
            TodoRoute::List => "list",
            TodoRoute::Get => "get",
            TodoRoute::Update => "update",
            TodoRoute::Delete => "delete",
        }
    }
}

impl fmt::Display for TodoRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoRoute {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|route| route.as_str() == normalized)
            .ok_or_else(|| {
                format!("unknown route '{value}'; expected one of create, list, get, update, delete")
            })
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ApiConfig {
    #[serde(deserialize_with = "comma_list")]
    pub routes: Vec<TodoRoute>,
    /// Answer failed creates with 200 instead of 500, as older clients expect.
    pub legacy_create_error_status: bool,
}

impl ApiConfig {
    pub fn is_enabled(&self, route: TodoRoute) -> bool {
        self.routes.contains(&route)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            routes: TodoRoute::ALL.to_vec(),
            legacy_create_error_status: false,
        }
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Accepts either a sequence or a single comma separated string, which is how
/// list values arrive from environment variables.
fn comma_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        One(String),
        Many(Vec<String>),
    }

    let items = match Raw::deserialize(deserializer)? {
        Raw::One(value) => value
            .split(',')
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect(),
        Raw::Many(values) => values,
    };

    items
        .iter()
        .map(|item| item.parse::<T>().map_err(serde::de::Error::custom))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{AppConfig, CorsMode, TodoRoute};

    #[test]
    fn defaults_enable_every_route_with_permissive_cors() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.general.port, 3000);
        assert_eq!(cfg.cors.mode, CorsMode::Any);
        assert_eq!(cfg.api.routes, TodoRoute::ALL.to_vec());
        assert!(!cfg.api.legacy_create_error_status);
    }

    #[test]
    fn comma_separated_lists_are_split_and_trimmed() {
        let cfg: AppConfig = serde_json::from_value(json!({
            "cors": {
                "mode": "origins",
                "allowed_origins": "https://app.example.com, https://admin.example.com",
            },
            "api": { "routes": "create, list" }
        }))
        .expect("config should deserialize");

        assert_eq!(cfg.cors.mode, CorsMode::Origins);
        assert_eq!(
            cfg.cors.allowed_origins,
            vec!["https://app.example.com", "https://admin.example.com"]
        );
        assert_eq!(cfg.api.routes, vec![TodoRoute::Create, TodoRoute::List]);
    }

    #[test]
    fn unknown_route_names_are_rejected() {
        let err = serde_json::from_value::<AppConfig>(json!({ "api": { "routes": "create,patch" } }))
            .expect_err("unknown route should fail");

        assert!(err.to_string().contains("unknown route 'patch'"));
    }
}
