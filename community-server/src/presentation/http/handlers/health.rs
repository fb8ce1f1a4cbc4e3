use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct HealthDto {
    pub(crate) status: String,
    pub(crate) message: String,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) environment: String,
    pub(crate) storage: String,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Server is running", body = HealthDto)
    )
)]
pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "OK".to_string(),
        message: "Telegram Community API is running".to_string(),
        timestamp: Utc::now(),
        environment: state.runtime.environment.clone(),
        storage: state.runtime.storage.to_string(),
    })
}

pub(crate) async fn api_not_found() -> AppError {
    AppError::NotFound
}

pub(crate) async fn api_method_not_allowed() -> AppError {
    AppError::MethodNotAllowed
}
