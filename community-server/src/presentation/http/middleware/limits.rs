use std::any::Any;
use std::time::Duration;

use anyhow::anyhow;
use axum::{
    BoxError, Router,
    error_handling::HandleErrorLayer,
    extract::DefaultBodyLimit,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use crate::infrastructure::settings::Settings;
use crate::presentation::http::app_error::AppError;

pub(crate) fn apply_limits(router: Router, settings: &Settings) -> Router {
    router
        .layer(DefaultBodyLimit::max(settings.http_request_body_limit_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(HandleErrorLayer::new(handle_middleware_error))
                .timeout(Duration::from_secs(settings.http_request_timeout_secs))
                .concurrency_limit(settings.http_concurrency_limit),
        )
}

/// Outermost layer: a panicking handler answers 500 instead of dropping the connection.
pub(crate) fn apply_catch_panic(router: Router) -> Router {
    router.layer(CatchPanicLayer::custom(handle_panic))
}

async fn handle_middleware_error(err: BoxError) -> AppError {
    if err.is::<tower::timeout::error::Elapsed>() {
        return AppError::Rejected {
            status: StatusCode::REQUEST_TIMEOUT,
            message: "Request timed out".to_string(),
        };
    }
    AppError::Internal(anyhow!("unhandled middleware error: {err}"))
}

fn handle_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    error!(%detail, "request handler panicked");
    AppError::Internal(anyhow!("handler panicked: {detail}")).into_response()
}
