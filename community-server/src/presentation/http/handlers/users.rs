use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::domain::referral::ReferralStats;
use crate::domain::user::{ProfileFields, RegisterUserRequest, User};
use crate::presentation::AppState;
use crate::presentation::http::app_error::AppResult;
use crate::presentation::http::extract::{ApiJson, ApiPath};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub(crate) struct RegisterUserDto {
    pub(crate) telegram_id: Option<i64>,
    #[validate(length(max = 256))]
    pub(crate) first_name: Option<String>,
    #[validate(length(max = 256))]
    pub(crate) last_name: Option<String>,
    #[validate(length(max = 64))]
    pub(crate) username: Option<String>,
    #[validate(length(max = 2048))]
    pub(crate) photo_url: Option<String>,
    /// Referral code of the inviting user, e.g. the mini-app `start_param`.
    #[validate(length(max = 64))]
    pub(crate) referrer_code: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct UserDto {
    pub(crate) telegram_id: i64,
    pub(crate) first_name: String,
    pub(crate) last_name: String,
    pub(crate) username: String,
    pub(crate) photo_url: String,
    pub(crate) referral_code: String,
    pub(crate) referred_by: Option<i64>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct ReferralStatsDto {
    pub(crate) referral_count: i64,
    pub(crate) bonus: i64,
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            telegram_id: user.telegram_id,
            first_name: user.first_name,
            last_name: user.last_name,
            username: user.username,
            photo_url: user.photo_url,
            referral_code: user.referral_code,
            referred_by: user.referred_by,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

impl From<ReferralStats> for ReferralStatsDto {
    fn from(stats: ReferralStats) -> Self {
        Self {
            referral_count: stats.referral_count,
            bonus: stats.bonus,
        }
    }
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "users",
    request_body = RegisterUserDto,
    responses(
        (status = 200, description = "User created or refreshed", body = UserDto),
        (status = 400, description = "Telegram ID missing or invalid"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn register_user(
    State(state): State<AppState>,
    ApiJson(dto): ApiJson<RegisterUserDto>,
) -> AppResult<Json<UserDto>> {
    dto.validate()?;
    let req = RegisterUserRequest {
        telegram_id: dto.telegram_id,
        profile: ProfileFields {
            first_name: dto.first_name,
            last_name: dto.last_name,
            username: dto.username,
            photo_url: dto.photo_url,
        },
        referrer_code: dto.referrer_code,
    };

    let user = state.user_service.register(req).await?;
    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/{telegram_id}",
    tag = "users",
    params(
        ("telegram_id" = i64, Path, description = "Telegram user id")
    ),
    responses(
        (status = 200, description = "User found", body = UserDto),
        (status = 404, description = "User not found"),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_user(
    State(state): State<AppState>,
    ApiPath(telegram_id): ApiPath<i64>,
) -> AppResult<Json<UserDto>> {
    let user = state.user_service.get_user(telegram_id).await?;

    Ok(Json(user.into()))
}

#[utoipa::path(
    get,
    path = "/api/users/{telegram_id}/referrals",
    tag = "users",
    params(
        ("telegram_id" = i64, Path, description = "Telegram user id")
    ),
    responses(
        (status = 200, description = "Referral count and bonus", body = ReferralStatsDto),
        (status = 500, description = "Internal error")
    )
)]
pub(crate) async fn get_referrals(
    State(state): State<AppState>,
    ApiPath(telegram_id): ApiPath<i64>,
) -> AppResult<Json<ReferralStatsDto>> {
    let stats = state.referral_service.count_referrals(telegram_id).await?;

    Ok(Json(stats.into()))
}
