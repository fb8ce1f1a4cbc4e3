use utoipa::OpenApi;

use crate::presentation::http::handlers::health::HealthDto;
use crate::presentation::http::handlers::posts::{CreatePostDto, DeletePostResponseDto, PostDto};
use crate::presentation::http::handlers::users::{ReferralStatsDto, RegisterUserDto, UserDto};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::presentation::http::handlers::health::health,
        crate::presentation::http::handlers::posts::list_posts,
        crate::presentation::http::handlers::posts::create_post,
        crate::presentation::http::handlers::posts::delete_post,
        crate::presentation::http::handlers::users::register_user,
        crate::presentation::http::handlers::users::get_user,
        crate::presentation::http::handlers::users::get_referrals
    ),
    components(
        schemas(
            HealthDto,
            CreatePostDto,
            PostDto,
            DeletePostResponseDto,
            RegisterUserDto,
            UserDto,
            ReferralStatsDto
        )
    ),
    tags(
        (name = "health", description = "Liveness"),
        (name = "posts", description = "Community posts"),
        (name = "users", description = "Telegram users and referrals")
    )
)]
pub(crate) struct ApiDoc;
