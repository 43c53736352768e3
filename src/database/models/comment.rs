use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub comment: Comment,
    pub author_display_name: String,
    pub author_avatar_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CommentInput {
    pub content: String,
}
