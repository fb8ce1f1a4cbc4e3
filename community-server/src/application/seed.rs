use tracing::info;

use crate::application::post_service::PostService;
use crate::application::user_service::UserService;
use crate::data::post_repository::PostRepository;
use crate::data::referral_repository::ReferralRepository;
use crate::data::user_repository::UserRepository;
use crate::domain::error::DomainError;
use crate::domain::post::CreatePostRequest;
use crate::domain::user::{ProfileFields, RegisterUserRequest};

const WELCOME_POSTS: [(&str, &str); 2] = [
    (
        "How the referral system works",
        "Invite friends with your referral link and earn a bonus for every person who joins!",
    ),
    (
        "Welcome to our community!",
        "We are glad to see you in our Telegram community. Here you will find news and people who share your interests.",
    ),
];

/// Creates the admin account if missing and, on an empty store, the welcome
/// posts. Safe to run on every start; an existing admin profile is left as is.
pub(crate) async fn seed_defaults<P, U, F>(
    posts: &PostService<P>,
    users: &UserService<U, F>,
    admin_telegram_id: i64,
) -> Result<(), DomainError>
where
    P: PostRepository + ?Sized,
    U: UserRepository + ?Sized,
    F: ReferralRepository + ?Sized,
{
    match users.get_user(admin_telegram_id).await {
        Ok(_) => info!(admin_telegram_id, "admin already registered"),
        Err(DomainError::NotFound(_)) => register_admin(users, admin_telegram_id).await?,
        Err(err) => return Err(err),
    }

    if posts.total_posts().await? > 0 {
        info!("post store not empty, skipping welcome posts");
        return Ok(());
    }

    // created oldest first so the welcome post ends up on top
    for (title, content) in WELCOME_POSTS.iter().rev() {
        posts
            .create_post(CreatePostRequest {
                title: Some(title.to_string()),
                content: Some(content.to_string()),
                author_id: Some(admin_telegram_id),
            })
            .await?;
    }

    info!(admin_telegram_id, "seeded welcome posts");
    Ok(())
}

async fn register_admin<U, F>(
    users: &UserService<U, F>,
    admin_telegram_id: i64,
) -> Result<(), DomainError>
where
    U: UserRepository + ?Sized,
    F: ReferralRepository + ?Sized,
{
    users
        .register(RegisterUserRequest {
            telegram_id: Some(admin_telegram_id),
            profile: ProfileFields {
                first_name: Some("Admin".to_string()),
                last_name: Some("User".to_string()),
                username: Some("admin".to_string()),
                photo_url: None,
            },
            referrer_code: None,
        })
        .await?;
    info!(admin_telegram_id, "admin registered");
    Ok(())
}
