use chrono::{DateTime, Utc};
use serde::Serialize;

use super::error::DomainError;

pub(crate) const DEFAULT_FIRST_NAME: &str = "User";
const REFERRAL_CODE_PREFIX: &str = "ref_";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub(crate) struct User {
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

/// Profile fields sent by the mini-app. `None` means "not supplied", which
/// keeps the stored value on refresh and falls back to a default on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ProfileFields {
    pub(crate) first_name: Option<String>,
    pub(crate) last_name: Option<String>,
    pub(crate) username: Option<String>,
    pub(crate) photo_url: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct RegisterUserRequest {
    pub(crate) telegram_id: Option<i64>,
    pub(crate) profile: ProfileFields,
    pub(crate) referrer_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ValidRegistration {
    pub(crate) telegram_id: i64,
    pub(crate) profile: ProfileFields,
    pub(crate) referrer_code: Option<String>,
}

impl RegisterUserRequest {
    pub(crate) fn validate(self) -> Result<ValidRegistration, DomainError> {
        let telegram_id = match self.telegram_id {
            None | Some(0) => {
                return Err(DomainError::Validation {
                    field: "telegram_id",
                    message: "Telegram ID is required",
                });
            }
            Some(id) => validate_telegram_id(id)?,
        };

        Ok(ValidRegistration {
            telegram_id,
            profile: ProfileFields {
                first_name: normalize_optional(self.profile.first_name),
                last_name: normalize_optional(self.profile.last_name),
                username: normalize_optional(self.profile.username),
                photo_url: normalize_optional(self.profile.photo_url),
            },
            referrer_code: normalize_optional(self.referrer_code),
        })
    }
}

impl User {
    /// Builds a freshly registered user, filling absent profile fields with defaults.
    pub(crate) fn create(
        telegram_id: i64,
        profile: ProfileFields,
        referred_by: Option<i64>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            telegram_id,
            first_name: profile
                .first_name
                .unwrap_or_else(|| DEFAULT_FIRST_NAME.to_string()),
            last_name: profile.last_name.unwrap_or_default(),
            username: profile.username.unwrap_or_default(),
            photo_url: profile.photo_url.unwrap_or_default(),
            referral_code: referral_code_for(telegram_id),
            referred_by,
            created_at: now,
            updated_at: now,
        }
    }

    /// Overwrites supplied profile fields; identity, referral data and `created_at` stay put.
    pub(crate) fn refresh(&mut self, profile: ProfileFields, now: DateTime<Utc>) {
        if let Some(first_name) = profile.first_name {
            self.first_name = first_name;
        }
        if let Some(last_name) = profile.last_name {
            self.last_name = last_name;
        }
        if let Some(username) = profile.username {
            self.username = username;
        }
        if let Some(photo_url) = profile.photo_url {
            self.photo_url = photo_url;
        }
        self.updated_at = now;
    }
}

pub(crate) fn validate_telegram_id(telegram_id: i64) -> Result<i64, DomainError> {
    if telegram_id <= 0 {
        return Err(DomainError::Validation {
            field: "telegram_id",
            message: "Telegram ID must be a positive integer",
        });
    }
    Ok(telegram_id)
}

pub(crate) fn referral_code_for(telegram_id: i64) -> String {
    format!("{REFERRAL_CODE_PREFIX}{telegram_id}")
}

/// Extracts the inviter's Telegram id from a referral code such as `ref_42`.
pub(crate) fn parse_referral_code(code: &str) -> Option<i64> {
    code.trim()
        .strip_prefix(REFERRAL_CODE_PREFIX)
        .and_then(|rest| rest.parse::<i64>().ok())
        .filter(|id| *id > 0)
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string())
}
