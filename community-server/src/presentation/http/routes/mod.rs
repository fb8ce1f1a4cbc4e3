use axum::{Router, routing::get};

use super::handlers::health::{api_method_not_allowed, api_not_found, health};
use crate::presentation::AppState;

pub(crate) mod posts;
pub(crate) mod users;

pub(crate) fn router() -> Router<AppState> {
    let api = Router::new()
        .merge(posts::router())
        .merge(users::router())
        .fallback(api_not_found)
        .method_not_allowed_fallback(api_method_not_allowed);

    Router::new()
        .route("/health", get(health))
        .nest("/api", api)
}
