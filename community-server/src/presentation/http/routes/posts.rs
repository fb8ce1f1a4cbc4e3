use axum::Router;
use axum::routing::{delete, get};

use crate::presentation::AppState;
use crate::presentation::http::handlers::posts::{create_post, delete_post, list_posts};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route("/posts/{id}", delete(delete_post))
}
