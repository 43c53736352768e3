use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_MIN_PARTICIPANTS: i32 = 1;
pub const DEFAULT_MAX_PARTICIPANTS: i32 = 100;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Sport {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub min_participants: Option<i32>,
    pub max_participants: Option<i32>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Sport {
    /// Inclusive participant bounds, falling back to 1..=100 when unset.
    pub fn participant_bounds(&self) -> (i32, i32) {
        (
            self.min_participants.unwrap_or(DEFAULT_MIN_PARTICIPANTS),
            self.max_participants.unwrap_or(DEFAULT_MAX_PARTICIPANTS),
        )
    }
}
