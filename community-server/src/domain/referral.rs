use serde::Serialize;

pub(crate) const REFERRAL_BONUS_PER_INVITE: i64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Referral {
    pub(crate) referrer_id: i64,
    pub(crate) referred_id: i64,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub(crate) struct ReferralStats {
    pub(crate) referral_count: i64,
    pub(crate) bonus: i64,
}

impl ReferralStats {
    pub(crate) fn from_count(referral_count: i64) -> Self {
        let referral_count = referral_count.max(0);
        Self {
            referral_count,
            bonus: referral_count.saturating_mul(REFERRAL_BONUS_PER_INVITE),
        }
    }
}
