use std::sync::Arc;

use tracing::{debug, info};

use crate::application::referral_service::ReferralService;
use crate::data::referral_repository::ReferralRepository;
use crate::data::user_repository::{NewUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{RegisterUserRequest, User, parse_referral_code};

pub(crate) struct UserService<U, F>
where
    U: UserRepository + ?Sized,
    F: ReferralRepository + ?Sized,
{
    repo: Arc<U>,
    referrals: Arc<ReferralService<F>>,
}

impl<U, F> UserService<U, F>
where
    U: UserRepository + ?Sized,
    F: ReferralRepository + ?Sized,
{
    pub(crate) fn new(repo: Arc<U>, referrals: Arc<ReferralService<F>>) -> Self {
        Self { repo, referrals }
    }

    /// Create-or-refresh: the first call creates the user, later calls only
    /// overwrite the profile fields they carry.
    pub(crate) async fn register(&self, req: RegisterUserRequest) -> Result<User, DomainError> {
        let req = req.validate()?;

        let referred_by = match req.referrer_code.as_deref() {
            Some(code) => self.resolve_referrer(req.telegram_id, code).await?,
            None => None,
        };

        let registration = self
            .repo
            .register_user(NewUser {
                telegram_id: req.telegram_id,
                profile: req.profile,
                referred_by,
            })
            .await?;

        // edge writes are idempotent, so a refresh repairs a missed edge
        if let Some(referrer_id) = registration.user.referred_by {
            self.referrals
                .record_referral(referrer_id, registration.user.telegram_id)
                .await?;
        }

        info!(
            telegram_id = registration.user.telegram_id,
            created = registration.created,
            "user registered"
        );
        Ok(registration.user)
    }

    pub(crate) async fn get_user(&self, telegram_id: i64) -> Result<User, DomainError> {
        self.repo
            .find_by_telegram_id(telegram_id)
            .await?
            .ok_or(DomainError::NotFound("User"))
    }

    async fn resolve_referrer(
        &self,
        telegram_id: i64,
        code: &str,
    ) -> Result<Option<i64>, DomainError> {
        let Some(referrer_id) = parse_referral_code(code) else {
            debug!(telegram_id, code, "ignoring malformed referral code");
            return Ok(None);
        };
        if referrer_id == telegram_id {
            debug!(telegram_id, "ignoring self-referral");
            return Ok(None);
        }
        if self.repo.find_by_telegram_id(referrer_id).await?.is_none() {
            debug!(telegram_id, referrer_id, "ignoring referral from unknown user");
            return Ok(None);
        }
        Ok(Some(referrer_id))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    use async_trait::async_trait;

    use super::UserService;
    use crate::application::referral_service::ReferralService;
    use crate::data::referral_repository::ReferralRepository;
    use crate::data::repositories::memory::referral_repository::MemoryReferralRepository;
    use crate::data::repositories::memory::user_repository::MemoryUserRepository;
    use crate::domain::error::DomainError;
    use crate::domain::user::{ProfileFields, RegisterUserRequest};

    struct Fixture {
        users: UserService<MemoryUserRepository, MemoryReferralRepository>,
        referrals: Arc<ReferralService<MemoryReferralRepository>>,
    }

    fn fixture() -> Fixture {
        let referrals = Arc::new(ReferralService::new(Arc::new(
            MemoryReferralRepository::new(),
        )));
        let users = UserService::new(Arc::new(MemoryUserRepository::new()), referrals.clone());
        Fixture { users, referrals }
    }

    fn register_request(telegram_id: i64, referrer_code: Option<&str>) -> RegisterUserRequest {
        RegisterUserRequest {
            telegram_id: Some(telegram_id),
            profile: ProfileFields::default(),
            referrer_code: referrer_code.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn register_then_get_returns_same_record() {
        let fx = fixture();

        let user = fx
            .users
            .register(register_request(42, None))
            .await
            .expect("register");
        assert!(user.referral_code.contains("42"));

        let fetched = fx.users.get_user(42).await.expect("get");
        assert_eq!(fetched, user);
    }

    #[tokio::test]
    async fn register_without_telegram_id_is_a_validation_error() {
        let fx = fixture();

        let err = fx
            .users
            .register(RegisterUserRequest::default())
            .await
            .expect_err("must fail");
        assert!(matches!(err, DomainError::Validation { field: "telegram_id", .. }));
    }

    #[tokio::test]
    async fn get_unknown_user_is_not_found() {
        let fx = fixture();

        let err = fx.users.get_user(7).await.expect_err("must be missing");
        assert!(matches!(err, DomainError::NotFound("User")));
    }

    #[tokio::test]
    async fn referral_is_recorded_once_on_creation() {
        let fx = fixture();
        fx.users
            .register(register_request(1, None))
            .await
            .expect("register referrer");

        let invited = fx
            .users
            .register(register_request(2, Some("ref_1")))
            .await
            .expect("register invited");
        assert_eq!(invited.referred_by, Some(1));

        fx.users
            .register(register_request(2, Some("ref_1")))
            .await
            .expect("register invited again");

        let stats = fx.referrals.count_referrals(1).await.expect("count");
        assert_eq!(stats.referral_count, 1);
        assert_eq!(stats.bonus, 10);
    }

    #[tokio::test]
    async fn invalid_referrer_codes_are_ignored() {
        let fx = fixture();

        for code in ["garbage", "ref_999", "ref_3"] {
            let user = fx
                .users
                .register(register_request(3, Some(code)))
                .await
                .expect("register");
            assert_eq!(user.referred_by, None);
        }

        assert_eq!(
            fx.referrals.count_referrals(999).await.expect("count").referral_count,
            0
        );
    }

    /// Fails the first edge write, then delegates to the memory store.
    #[derive(Default)]
    struct FlakyReferralRepo {
        inner: MemoryReferralRepository,
        failed_once: AtomicBool,
    }

    #[async_trait]
    impl ReferralRepository for FlakyReferralRepo {
        async fn add_referral(
            &self,
            referrer_id: i64,
            referred_id: i64,
        ) -> Result<bool, DomainError> {
            if !self.failed_once.swap(true, Ordering::SeqCst) {
                return Err(DomainError::Unexpected("database is locked".to_string()));
            }
            self.inner.add_referral(referrer_id, referred_id).await
        }

        async fn count_referrals(&self, referrer_id: i64) -> Result<i64, DomainError> {
            self.inner.count_referrals(referrer_id).await
        }
    }

    #[tokio::test]
    async fn retry_after_failed_edge_write_records_the_referral() {
        let referrals = Arc::new(ReferralService::new(Arc::new(FlakyReferralRepo::default())));
        let users = UserService::new(Arc::new(MemoryUserRepository::new()), referrals.clone());

        users
            .register(register_request(1, None))
            .await
            .expect("register referrer");

        let err = users
            .register(register_request(2, Some("ref_1")))
            .await
            .expect_err("edge write fails once");
        assert!(matches!(err, DomainError::Unexpected(_)));

        let invited = users
            .register(register_request(2, None))
            .await
            .expect("retry");
        assert_eq!(invited.referred_by, Some(1));

        let stats = referrals.count_referrals(1).await.expect("count");
        assert_eq!(stats.referral_count, 1);
        assert_eq!(stats.bonus, 10);
    }
}
