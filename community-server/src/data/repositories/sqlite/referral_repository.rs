use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;

use crate::data::referral_repository::ReferralRepository;
use crate::domain::error::DomainError;

use super::map_db_error;

#[derive(Debug, Clone)]
pub(crate) struct SqliteReferralRepository {
    pool: SqlitePool,
}

impl SqliteReferralRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReferralRepository for SqliteReferralRepository {
    async fn add_referral(&self, referrer_id: i64, referred_id: i64) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r#"
            INSERT INTO referrals (referrer_id, referred_id, created_at)
            VALUES (?, ?, ?)
            ON CONFLICT(referred_id) DO NOTHING
            "#,
        )
        .bind(referrer_id)
        .bind(referred_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn count_referrals(&self, referrer_id: i64) -> Result<i64, DomainError> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM referrals
            WHERE referrer_id = ?
            "#,
        )
        .bind(referrer_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)
    }
}
