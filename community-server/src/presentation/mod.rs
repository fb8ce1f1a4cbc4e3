use std::sync::Arc;

use crate::application::post_service::PostService;
use crate::application::referral_service::ReferralService;
use crate::application::user_service::UserService;
use crate::data::post_repository::PostRepository;
use crate::data::referral_repository::ReferralRepository;
use crate::data::repositories::Repositories;
use crate::data::user_repository::UserRepository;
use crate::infrastructure::settings::StorageBackend;

pub(crate) mod http;

pub(crate) type AppPostService = PostService<dyn PostRepository>;
pub(crate) type AppUserService = UserService<dyn UserRepository, dyn ReferralRepository>;
pub(crate) type AppReferralService = ReferralService<dyn ReferralRepository>;

#[derive(Debug, Clone)]
pub(crate) struct RuntimeInfo {
    pub(crate) environment: String,
    pub(crate) storage: StorageBackend,
}

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) post_service: Arc<AppPostService>,
    pub(crate) user_service: Arc<AppUserService>,
    pub(crate) referral_service: Arc<AppReferralService>,
    pub(crate) runtime: Arc<RuntimeInfo>,
}

impl AppState {
    pub(crate) fn new(repos: Repositories, runtime: RuntimeInfo) -> Self {
        let referral_service = Arc::new(ReferralService::new(repos.referrals));
        let user_service = Arc::new(UserService::new(repos.users, referral_service.clone()));
        let post_service = Arc::new(PostService::new(repos.posts));

        Self {
            post_service,
            user_service,
            referral_service,
            runtime: Arc::new(runtime),
        }
    }
}
