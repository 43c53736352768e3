use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Rating {
    pub id: Uuid,
    pub invitation_id: Uuid,
    pub rater_id: Uuid,
    pub rated_user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub would_play_again: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RatingInput {
    pub invitation_id: Uuid,
    pub rated_user_id: Uuid,
    pub rating: i32,
    pub comment: Option<String>,
    pub would_play_again: Option<bool>,
}

/// A rating as shown on the rated user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReceivedRating {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub rating: Rating,
    pub rater_display_name: String,
    pub rater_avatar_url: Option<String>,
    pub sport_name: String,
    pub venue: String,
    pub start_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RatingStats {
    pub average_rating: f64,
    pub total_ratings: i64,
    pub would_play_again_percentage: i64,
}

impl Default for RatingStats {
    fn default() -> Self {
        Self {
            average_rating: 0.0,
            total_ratings: 0,
            would_play_again_percentage: 0,
        }
    }
}
