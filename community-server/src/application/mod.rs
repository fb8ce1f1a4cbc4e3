pub(crate) mod post_service;
pub(crate) mod referral_service;
pub(crate) mod seed;
pub(crate) mod user_service;
