use std::sync::Arc;

use tracing::info;

use crate::data::referral_repository::ReferralRepository;
use crate::domain::error::DomainError;
use crate::domain::referral::ReferralStats;

pub(crate) struct ReferralService<R: ReferralRepository + ?Sized> {
    repo: Arc<R>,
}

impl<R: ReferralRepository + ?Sized> ReferralService<R> {
    pub(crate) fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Referral count and bonus for `telegram_id`; unknown users simply have none.
    pub(crate) async fn count_referrals(&self, telegram_id: i64) -> Result<ReferralStats, DomainError> {
        let count = self.repo.count_referrals(telegram_id).await?;
        Ok(ReferralStats::from_count(count))
    }

    /// Returns whether a new edge was stored.
    pub(crate) async fn record_referral(
        &self,
        referrer_id: i64,
        referred_id: i64,
    ) -> Result<bool, DomainError> {
        if referrer_id == referred_id {
            return Ok(false);
        }

        let recorded = self.repo.add_referral(referrer_id, referred_id).await?;
        if recorded {
            info!(referrer_id, referred_id, "referral recorded");
        }
        Ok(recorded)
    }
}
