use async_trait::async_trait;
use sqlx::PgPool;
use time::OffsetDateTime;

use crate::models::User;

/// Row-level access to the `users` table. Every call touches at most one row.
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error>;

    async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error>;

    async fn set_reset_token(
        &self,
        user_id: i32,
        token: &str,
        expiry: OffsetDateTime,
    ) -> Result<(), sqlx::Error>;

    /// Only returns a user whose token has not yet expired.
    async fn find_by_valid_reset_token(&self, token: &str) -> Result<Option<User>, sqlx::Error>;

    /// Stores the new hash and clears the token in one write. Returns `false`
    /// when the token no longer matches a live row.
    async fn consume_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error>;
}

pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "
            SELECT
                id,
                name,
                email,
                password_hash,
                reset_token,
                reset_token_expiry
            FROM
                users
            WHERE
                email = $1
            ",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
    }

    async fn insert(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<User, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "
            INSERT INTO users (name, email, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, name, email, password_hash, reset_token, reset_token_expiry
            ",
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
    }

    async fn set_reset_token(
        &self,
        user_id: i32,
        token: &str,
        expiry: OffsetDateTime,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            "
            UPDATE users
            SET reset_token = $1, reset_token_expiry = $2
            WHERE id = $3
            ",
        )
        .bind(token)
        .bind(expiry)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_valid_reset_token(&self, token: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(
            "
            SELECT
                id,
                name,
                email,
                password_hash,
                reset_token,
                reset_token_expiry
            FROM
                users
            WHERE
                reset_token = $1 AND
                reset_token_expiry > NOW()
            ",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        password_hash: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "
            UPDATE users
            SET password_hash = $1, reset_token = NULL, reset_token_expiry = NULL
            WHERE reset_token = $2 AND reset_token_expiry > NOW()
            ",
        )
        .bind(password_hash)
        .bind(token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }
}
