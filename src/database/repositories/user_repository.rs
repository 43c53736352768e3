use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{UpdateProfileInput, User},
    utils::sql,
};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_user(&self, user: &User) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            INSERT INTO
                users (
                    id,
                    email,
                    password_hash,
                    display_name,
                    avatar_url,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                email,
                password_hash,
                display_name,
                avatar_url,
                created_at,
                updated_at
        "#))
        .bind(user.id)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(&user.display_name)
        .bind(&user.avatar_url)
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                id,
                email,
                password_hash,
                display_name,
                avatar_url,
                created_at,
                updated_at
            FROM
                users
            WHERE
                email = ?
        "#))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            SELECT
                id,
                email,
                password_hash,
                display_name,
                avatar_url,
                created_at,
                updated_at
            FROM
                users
            WHERE
                id = ?
        "#))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(&sql(r#"
            SELECT EXISTS (
                SELECT 1 FROM users WHERE email = ?
            )
        "#))
        .bind(email)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    /// Expects input already passed through `validation::validate_profile`.
    pub async fn update_profile(&self, id: Uuid, input: &UpdateProfileInput) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&sql(r#"
            UPDATE users
            SET
                display_name = ?,
                avatar_url = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                email,
                password_hash,
                display_name,
                avatar_url,
                created_at,
                updated_at
        "#))
        .bind(&input.display_name)
        .bind(&input.avatar_url)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}
