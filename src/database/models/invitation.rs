use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Invitation {
    pub id: Uuid,
    pub sport_id: Uuid,
    pub owner_id: Uuid,
    pub venue: String,
    pub venue_lat: Option<f64>,
    pub venue_lng: Option<f64>,
    pub start_at: DateTime<Utc>,
    pub duration_hours: BigDecimal,
    pub capacity: i32,
    pub note: Option<String>,
    pub is_canceled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Invitation {
    pub fn has_started(&self, now: DateTime<Utc>) -> bool {
        self.start_at < now
    }

    /// Listed on the public feed: not cancelled and not yet started.
    pub fn is_listed(&self, now: DateTime<Utc>) -> bool {
        !self.is_canceled && !self.has_started(now)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == user_id
    }
}

/// Create/update payload. Validated and sanitized by `services::validation`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationInput {
    pub sport_id: Uuid,
    pub venue: String,
    pub venue_lat: Option<f64>,
    pub venue_lng: Option<f64>,
    pub start_at: DateTime<Utc>,
    pub duration_hours: BigDecimal,
    pub capacity: i32,
    pub note: Option<String>,
}

/// An invitation joined with the names the feed and profile pages display.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct InvitationDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub invitation: Invitation,
    pub sport_name: String,
    pub sport_slug: String,
    pub owner_display_name: String,
    pub participant_count: i64,
}
