use async_trait::async_trait;

use crate::domain::error::DomainError;

#[async_trait]
pub(crate) trait ReferralRepository: Send + Sync {
    /// Returns `false` when `referred_id` already has a referrer.
    async fn add_referral(&self, referrer_id: i64, referred_id: i64) -> Result<bool, DomainError>;
    async fn count_referrals(&self, referrer_id: i64) -> Result<i64, DomainError>;
}
