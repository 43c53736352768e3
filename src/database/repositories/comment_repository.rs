use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Comment, CommentWithAuthor},
    utils::sql,
};

#[derive(Clone)]
pub struct CommentRepository {
    pool: PgPool,
}

impl CommentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, invitation_id: Uuid, user_id: Uuid, content: &str) -> Result<Comment> {
        let comment = sqlx::query_as::<_, Comment>(&sql(r#"
            INSERT INTO
                invitation_comments (id, invitation_id, user_id, content, created_at)
            VALUES
                (?, ?, ?, ?, ?)
            RETURNING
                id,
                invitation_id,
                user_id,
                content,
                created_at
        "#))
        .bind(Uuid::new_v4())
        .bind(invitation_id)
        .bind(user_id)
        .bind(content)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(comment)
    }

    /// Chat history, oldest message first.
    pub async fn list_for_invitation(&self, invitation_id: Uuid) -> Result<Vec<CommentWithAuthor>> {
        let comments = sqlx::query_as::<_, CommentWithAuthor>(&sql(r#"
            SELECT
                c.id,
                c.invitation_id,
                c.user_id,
                c.content,
                c.created_at,
                u.display_name AS author_display_name,
                u.avatar_url AS author_avatar_url
            FROM
                invitation_comments c
                INNER JOIN users u ON u.id = c.user_id
            WHERE
                c.invitation_id = ?
            ORDER BY
                c.created_at ASC
        "#))
        .bind(invitation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(comments)
    }
}
