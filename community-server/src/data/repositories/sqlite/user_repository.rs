use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::data::user_repository::{NewUser, Registration, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::User;

use super::map_db_error;

#[derive(Debug, Clone)]
pub(crate) struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub(crate) fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    telegram_id: i64,
    first_name: String,
    last_name: String,
    username: String,
    photo_url: String,
    referral_code: String,
    referred_by: Option<i64>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            telegram_id: row.telegram_id,
            first_name: row.first_name,
            last_name: row.last_name,
            username: row.username,
            photo_url: row.photo_url,
            referral_code: row.referral_code,
            referred_by: row.referred_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const SELECT_USER: &str = r#"
    SELECT
        telegram_id,
        first_name,
        last_name,
        username,
        photo_url,
        referral_code,
        referred_by,
        created_at,
        updated_at
    FROM users
    WHERE telegram_id = ?
"#;

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn register_user(&self, input: NewUser) -> Result<Registration, DomainError> {
        let now = Utc::now();
        let fresh = User::create(
            input.telegram_id,
            input.profile.clone(),
            input.referred_by,
            now,
        );

        // the insert takes the write lock before anything is read
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO users (
                telegram_id, first_name, last_name, username, photo_url,
                referral_code, referred_by, created_at, updated_at
            )
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(telegram_id) DO NOTHING
            "#,
        )
        .bind(fresh.telegram_id)
        .bind(&fresh.first_name)
        .bind(&fresh.last_name)
        .bind(&fresh.username)
        .bind(&fresh.photo_url)
        .bind(&fresh.referral_code)
        .bind(fresh.referred_by)
        .bind(fresh.created_at)
        .bind(fresh.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?
        .rows_affected()
            > 0;

        if !inserted {
            sqlx::query(
                r#"
                UPDATE users
                SET first_name = COALESCE(?, first_name),
                    last_name = COALESCE(?, last_name),
                    username = COALESCE(?, username),
                    photo_url = COALESCE(?, photo_url),
                    updated_at = ?
                WHERE telegram_id = ?
                "#,
            )
            .bind(input.profile.first_name)
            .bind(input.profile.last_name)
            .bind(input.profile.username)
            .bind(input.profile.photo_url)
            .bind(now)
            .bind(input.telegram_id)
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        let row = sqlx::query_as::<_, UserRow>(SELECT_USER)
            .bind(input.telegram_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(Registration {
            user: row.into(),
            created: inserted,
        })
    }

    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(SELECT_USER)
            .bind(telegram_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(row.map(User::from))
    }
}
