use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::{ProfileFields, User};

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) telegram_id: i64,
    pub(crate) profile: ProfileFields,
    /// Applied only when the call creates the user.
    pub(crate) referred_by: Option<i64>,
}

#[derive(Debug, Clone)]
pub(crate) struct Registration {
    pub(crate) user: User,
    pub(crate) created: bool,
}

#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    /// Creates the user or refreshes its profile, atomically per `telegram_id`.
    async fn register_user(&self, input: NewUser) -> Result<Registration, DomainError>;
    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, DomainError>;
}
