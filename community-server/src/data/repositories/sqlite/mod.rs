use crate::domain::error::DomainError;

pub(crate) mod post_repository;
pub(crate) mod referral_repository;
pub(crate) mod user_repository;

fn map_db_error(err: sqlx::Error) -> DomainError {
    DomainError::Unexpected(err.to_string())
}
