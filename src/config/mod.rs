pub mod configs;
pub mod defaults;
pub mod envconfig;
pub mod validate;

pub use configs::{
    ApiConfig, AppConfig, CorsConfig, CorsMode, DatabaseConfig, GeneralConfig, LogFormat,
    LoggingConfig, TodoRoute,
};
pub use envconfig::EnvConfig;
