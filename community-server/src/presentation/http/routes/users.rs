use axum::Router;
use axum::routing::{get, post};

use crate::presentation::AppState;
use crate::presentation::http::handlers::users::{get_referrals, get_user, register_user};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/users", post(register_user))
        .route("/users/{telegram_id}", get(get_user))
        .route("/users/{telegram_id}/referrals", get(get_referrals))
}
