use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::data::referral_repository::ReferralRepository;
use crate::domain::error::DomainError;
use crate::domain::referral::Referral;

#[derive(Debug, Default)]
pub(crate) struct MemoryReferralRepository {
    edges: RwLock<Vec<Referral>>,
}

impl MemoryReferralRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ReferralRepository for MemoryReferralRepository {
    async fn add_referral(&self, referrer_id: i64, referred_id: i64) -> Result<bool, DomainError> {
        let mut edges = self.edges.write().await;
        if edges.iter().any(|edge| edge.referred_id == referred_id) {
            return Ok(false);
        }
        edges.push(Referral {
            referrer_id,
            referred_id,
        });
        Ok(true)
    }

    async fn count_referrals(&self, referrer_id: i64) -> Result<i64, DomainError> {
        let edges = self.edges.read().await;
        Ok(edges
            .iter()
            .filter(|edge| edge.referrer_id == referrer_id)
            .count() as i64)
    }
}
