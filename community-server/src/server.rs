use std::path::Path;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::services::{ServeDir, ServeFile};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::infrastructure::settings::Settings;
use crate::presentation::AppState;
use crate::presentation::http::middleware::cors::apply_cors;
use crate::presentation::http::middleware::limits::{apply_catch_panic, apply_limits};
use crate::presentation::http::middleware::trace::apply_trace;
use crate::presentation::http::openapi::ApiDoc;
use crate::presentation::http::routes;

pub(crate) async fn run_http(settings: &Settings, state: AppState) -> anyhow::Result<()> {
    let app = build_router(state, settings)?;

    let listener = TcpListener::bind(&settings.http_addr).await?;

    info!("HTTP server listening on {}", settings.http_addr);
    info!("health check: http://{}/health", settings.http_addr);
    axum::serve(listener, app).await?;
    Ok(())
}

pub(crate) fn build_router(state: AppState, settings: &Settings) -> anyhow::Result<Router> {
    let app = routes::router()
        .with_state(state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(static_files(&settings.static_dir));

    let app = apply_limits(app, settings);
    let app = apply_trace(app);
    let app = apply_cors(app, settings)?;
    Ok(apply_catch_panic(app))
}

/// Front-end assets; unknown paths get `index.html` so client-side routing works.
fn static_files(static_dir: &str) -> ServeDir<ServeFile> {
    let index = Path::new(static_dir).join("index.html");
    ServeDir::new(static_dir).fallback(ServeFile::new(index))
}

#[cfg(test)]
mod tests {
    use axum::{
        Router,
        body::{Body, to_bytes},
        http::{Method, Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::build_router;
    use crate::data::repositories::Repositories;
    use crate::infrastructure::settings::{Settings, StorageBackend};
    use crate::presentation::http::middleware::limits::{apply_catch_panic, apply_limits};
    use crate::presentation::{AppState, RuntimeInfo};

    const PUBLIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../public");

    fn test_settings(overrides: &[(&str, &str)]) -> Settings {
        Settings::from_lookup(|key| {
            if let Some((_, value)) = overrides.iter().find(|(name, _)| *name == key) {
                return Some(value.to_string());
            }
            match key {
                "STORAGE_BACKEND" => Some("memory".to_string()),
                "APP_ENV" => Some("test".to_string()),
                _ => None,
            }
        })
        .expect("test settings must parse")
    }

    fn test_app() -> Router {
        test_app_with(&[])
    }

    fn test_app_with(overrides: &[(&str, &str)]) -> Router {
        let settings = test_settings(overrides);
        let state = AppState::new(
            Repositories::memory(),
            RuntimeInfo {
                environment: settings.environment.clone(),
                storage: StorageBackend::Memory,
            },
        );
        build_router(state, &settings).expect("router must build")
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let request = builder.body(body).expect("request must build");

        let response = app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, json)
    }

    #[tokio::test]
    async fn created_post_is_listed_first() {
        let app = test_app();
        send(
            &app,
            Method::POST,
            "/api/posts",
            Some(json!({ "title": "Older", "content": "Post" })),
        )
        .await;

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/posts",
            Some(json!({ "title": "Hi", "content": "World" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(created["title"], "Hi");
        assert_eq!(created["content"], "World");
        assert!(created["id"].is_i64());
        assert!(created["created_at"].is_string());

        let (status, listed) = send(&app, Method::GET, "/api/posts", None).await;
        assert_eq!(status, StatusCode::OK);
        let listed = listed.as_array().expect("posts must be an array");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0]["id"], created["id"]);
    }

    #[tokio::test]
    async fn create_post_without_content_is_bad_request() {
        let app = test_app();

        let (status, body) =
            send(&app, Method::POST, "/api/posts", Some(json!({ "title": "Hi" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Title and content are required" }));

        let (_, listed) = send(&app, Method::GET, "/api/posts", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn malformed_json_is_rejected_with_error_body() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/posts")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request must build");

        let response = app.oneshot(request).await.expect("router is infallible");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let body: Value = serde_json::from_slice(&bytes).expect("error body must be json");
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn delete_missing_post_is_not_found() {
        let app = test_app();

        let (status, body) = send(&app, Method::DELETE, "/api/posts/999999", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Post not found" }));
    }

    #[tokio::test]
    async fn delete_existing_post_removes_it() {
        let app = test_app();
        let (_, created) = send(
            &app,
            Method::POST,
            "/api/posts",
            Some(json!({ "title": "Bye", "content": "Soon gone", "author_id": 42 })),
        )
        .await;
        let uri = format!("/api/posts/{}", created["id"]);

        let (status, body) = send(&app, Method::DELETE, &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "success": true, "message": "Post deleted" }));

        let (_, listed) = send(&app, Method::GET, "/api/posts", None).await;
        assert_eq!(listed, json!([]));
    }

    #[tokio::test]
    async fn registered_user_can_be_fetched() {
        let app = test_app();

        let (status, user) =
            send(&app, Method::POST, "/api/users", Some(json!({ "telegram_id": 42 }))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["telegram_id"], 42);
        assert_eq!(user["first_name"], "User");
        assert!(
            user["referral_code"]
                .as_str()
                .expect("referral_code must be a string")
                .contains("42")
        );

        let (status, fetched) = send(&app, Method::GET, "/api/users/42", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched, user);
    }

    #[tokio::test]
    async fn register_without_telegram_id_is_bad_request() {
        let app = test_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/users",
            Some(json!({ "first_name": "Ann" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Telegram ID is required" }));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let app = test_app();

        let (status, body) = send(&app, Method::GET, "/api/users/7", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "User not found" }));
    }

    #[tokio::test]
    async fn referral_stats_follow_recorded_edges() {
        let app = test_app();

        let (status, stats) = send(&app, Method::GET, "/api/users/1/referrals", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats, json!({ "referral_count": 0, "bonus": 0 }));

        send(&app, Method::POST, "/api/users", Some(json!({ "telegram_id": 1 }))).await;
        send(
            &app,
            Method::POST,
            "/api/users",
            Some(json!({ "telegram_id": 2, "referrer_code": "ref_1" })),
        )
        .await;

        let (_, stats) = send(&app, Method::GET, "/api/users/1/referrals", None).await;
        assert_eq!(stats, json!({ "referral_count": 1, "bonus": 10 }));
    }

    #[tokio::test]
    async fn non_numeric_path_id_is_rejected_as_json() {
        let app = test_app();

        let (status, body) = send(&app, Method::DELETE, "/api/posts/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn unknown_api_route_is_json_not_found() {
        let app = test_app();

        let (status, body) = send(&app, Method::GET, "/api/nothing-here", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Not found" }));
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let app = test_app();

        let (status, body) = send(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "OK");
        assert_eq!(body["environment"], "test");
        assert_eq!(body["storage"], "memory");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn cors_preflight_is_answered() {
        let app = test_app();
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/posts")
            .header(header::ORIGIN, "https://web.telegram.org")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .expect("request must build");

        let response = app.oneshot(request).await.expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|value| value.to_str().ok()),
            Some("*")
        );
    }

    #[tokio::test]
    async fn wrong_method_under_api_is_json() {
        let app = test_app();

        let (status, body) =
            send(&app, Method::PUT, "/api/posts", Some(json!({ "title": "x" }))).await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body, json!({ "error": "Method not allowed" }));
    }

    #[tokio::test]
    async fn oversized_body_is_payload_too_large() {
        let app = test_app_with(&[("HTTP_REQUEST_BODY_LIMIT_BYTES", "64")]);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/posts",
            Some(json!({ "title": "Big", "content": "x".repeat(200) })),
        )
        .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert!(body["error"].is_string());

        let (_, listed) = send(&app, Method::GET, "/api/posts", None).await;
        assert_eq!(listed, json!([]));
    }

    async fn slow_handler() -> &'static str {
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        "too late"
    }

    async fn panicking_handler() -> &'static str {
        panic!("handler exploded")
    }

    fn guarded_app() -> Router {
        let settings = test_settings(&[("HTTP_REQUEST_TIMEOUT_SECS", "1")]);
        let app = Router::new()
            .route("/slow", axum::routing::get(slow_handler))
            .route("/panic", axum::routing::get(panicking_handler));
        apply_catch_panic(apply_limits(app, &settings))
    }

    #[tokio::test]
    async fn slow_request_times_out_with_json_error() {
        let app = guarded_app();

        let (status, body) = send(&app, Method::GET, "/slow", None).await;
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body, json!({ "error": "Request timed out" }));
    }

    #[tokio::test]
    async fn panicking_handler_answers_internal_error() {
        let app = guarded_app();

        let (status, body) = send(&app, Method::GET, "/panic", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }

    #[tokio::test]
    async fn unknown_front_end_route_serves_index() {
        let app = test_app_with(&[("STATIC_DIR", PUBLIC_DIR)]);
        let request = Request::builder()
            .uri("/some/spa/route")
            .body(Body::empty())
            .expect("request must build");

        let response = app.oneshot(request).await.expect("router is infallible");
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body must be readable");
        let page = String::from_utf8_lossy(&bytes);
        assert!(page.starts_with("<!doctype html>"));
    }
}
