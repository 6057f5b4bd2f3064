use anyhow::{Context, Result};
use axum::http::{HeaderName, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::config::{CorsConfig, CorsMode};

pub fn cors_layer(cfg: &CorsConfig) -> Result<CorsLayer> {
    match cfg.mode {
        CorsMode::Any => Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)),
        CorsMode::Origins => {
            let origins = cfg
                .allowed_origins
                .iter()
                .map(|origin| {
                    HeaderValue::from_str(origin)
                        .with_context(|| format!("invalid cors origin: {origin}"))
                })
                .collect::<Result<Vec<_>>>()?;
            let methods = cfg
                .allowed_methods
                .iter()
                .map(|method| {
                    Method::from_bytes(method.as_bytes())
                        .with_context(|| format!("invalid cors method: {method}"))
                })
                .collect::<Result<Vec<_>>>()?;
            let headers = cfg
                .allowed_headers
                .iter()
                .map(|header| {
                    HeaderName::from_bytes(header.as_bytes())
                        .with_context(|| format!("invalid cors header: {header}"))
                })
                .collect::<Result<Vec<_>>>()?;

            Ok(CorsLayer::new()
                .allow_origin(AllowOrigin::list(origins))
                .allow_methods(methods)
                .allow_headers(headers))
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
        routing::get,
    };
    use tower::ServiceExt;

    use super::cors_layer;
    use crate::config::{CorsConfig, CorsMode};

    fn app(cfg: &CorsConfig) -> Router {
        Router::new()
            .route("/todos", get(|| async { "ok" }))
            .layer(cors_layer(cfg).expect("cors config should build"))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/todos")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn any_mode_allows_every_origin() {
        let response = app(&CorsConfig::default())
            .oneshot(preflight("https://anywhere.example.com"))
            .await
            .expect("request should succeed");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn origins_mode_only_echoes_listed_origins() {
        let cfg = CorsConfig {
            mode: CorsMode::Origins,
            allowed_origins: vec!["https://app.example.com".to_string()],
            ..CorsConfig::default()
        };

        let allowed = app(&cfg)
            .oneshot(preflight("https://app.example.com"))
            .await
            .expect("request should succeed");
        let denied = app(&cfg)
            .oneshot(preflight("https://evil.example.com"))
            .await
            .expect("request should succeed");

        assert_eq!(
            allowed
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://app.example.com"
        );
        assert!(
            denied
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
