use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::data::user_repository::{NewUser, Registration, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::User;

#[derive(Debug, Default)]
pub(crate) struct MemoryUserRepository {
    users: RwLock<HashMap<i64, User>>,
}

impl MemoryUserRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn register_user(&self, input: NewUser) -> Result<Registration, DomainError> {
        let now = Utc::now();
        let mut users = self.users.write().await;

        if let Some(existing) = users.get_mut(&input.telegram_id) {
            existing.refresh(input.profile, now);
            return Ok(Registration {
                user: existing.clone(),
                created: false,
            });
        }

        let user = User::create(input.telegram_id, input.profile, input.referred_by, now);
        users.insert(user.telegram_id, user.clone());
        Ok(Registration {
            user,
            created: true,
        })
    }

    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, DomainError> {
        Ok(self.users.read().await.get(&telegram_id).cloned())
    }
}
