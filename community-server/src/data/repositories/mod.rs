use std::sync::Arc;

use sqlx::SqlitePool;

use crate::data::post_repository::PostRepository;
use crate::data::referral_repository::ReferralRepository;
use crate::data::user_repository::UserRepository;

pub(crate) mod memory;
pub(crate) mod sqlite;

/// One storage backend, wired as trait objects so the rest of the app never
/// knows which one is active.
#[derive(Clone)]
pub(crate) struct Repositories {
    pub(crate) posts: Arc<dyn PostRepository>,
    pub(crate) users: Arc<dyn UserRepository>,
    pub(crate) referrals: Arc<dyn ReferralRepository>,
}

impl Repositories {
    pub(crate) fn memory() -> Self {
        Self {
            posts: Arc::new(memory::post_repository::MemoryPostRepository::new()),
            users: Arc::new(memory::user_repository::MemoryUserRepository::new()),
            referrals: Arc::new(memory::referral_repository::MemoryReferralRepository::new()),
        }
    }

    pub(crate) fn sqlite(pool: SqlitePool) -> Self {
        Self {
            posts: Arc::new(sqlite::post_repository::SqlitePostRepository::new(pool.clone())),
            users: Arc::new(sqlite::user_repository::SqliteUserRepository::new(pool.clone())),
            referrals: Arc::new(sqlite::referral_repository::SqliteReferralRepository::new(pool)),
        }
    }
}
