use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::database::models::{Invitation, RatingStats};
use crate::error::AppError;
use crate::services::validation::FieldError;

/// How a user relates to an invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Membership {
    pub is_owner: bool,
    pub is_participant: bool,
}

impl Membership {
    pub fn new(invitation: &Invitation, user_id: Uuid, is_participant: bool) -> Self {
        Self {
            is_owner: invitation.is_owned_by(user_id),
            is_participant,
        }
    }

    pub fn is_member(&self) -> bool {
        self.is_owner || self.is_participant
    }
}

pub fn ensure_owner(invitation: &Invitation, user_id: Uuid) -> Result<(), AppError> {
    if invitation.is_owned_by(user_id) {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(
            "Only the organizer can manage this invitation".to_string(),
        ))
    }
}

/// Owner-side edits are only allowed while the invitation is live.
pub fn ensure_editable(invitation: &Invitation, now: DateTime<Utc>) -> Result<(), AppError> {
    if invitation.is_canceled {
        return Err(AppError::BadRequest(
            "This invitation has been cancelled".to_string(),
        ));
    }
    if invitation.has_started(now) {
        return Err(AppError::BadRequest(
            "This invitation has already started".to_string(),
        ));
    }
    Ok(())
}

/// A new capacity has to seat everyone who already joined.
pub fn ensure_capacity_covers(capacity: i32, joined: i64) -> Result<(), AppError> {
    if i64::from(capacity) < joined {
        return Err(AppError::ValidationError(vec![FieldError::new(
            "capacity",
            format!("Capacity cannot be lower than the {} people already joined", joined),
        )]));
    }
    Ok(())
}

pub fn ensure_can_comment(membership: Membership) -> Result<(), AppError> {
    if membership.is_member() {
        Ok(())
    } else {
        Err(AppError::PermissionDenied(
            "Join the invitation to take part in the chat".to_string(),
        ))
    }
}

pub fn ensure_can_rate(
    invitation: &Invitation,
    rater_id: Uuid,
    rated_user_id: Uuid,
    rater: Membership,
    rated: Membership,
    now: DateTime<Utc>,
) -> Result<(), AppError> {
    if rater_id == rated_user_id {
        return Err(AppError::BadRequest("You cannot rate yourself".to_string()));
    }
    if !invitation.has_started(now) {
        return Err(AppError::BadRequest(
            "Ratings open once the game has started".to_string(),
        ));
    }
    if !rater.is_member() {
        return Err(AppError::PermissionDenied(
            "Only players of this invitation can leave ratings".to_string(),
        ));
    }
    if !rated.is_member() {
        return Err(AppError::BadRequest(
            "That user did not take part in this invitation".to_string(),
        ));
    }
    Ok(())
}

/// Summarizes `(score, would_play_again)` pairs. Average is rounded to one
/// decimal and the play-again share to a whole percent.
pub fn rating_stats(ratings: &[(i32, bool)]) -> RatingStats {
    if ratings.is_empty() {
        return RatingStats::default();
    }

    let total = ratings.len() as f64;
    let sum: i64 = ratings.iter().map(|(score, _)| i64::from(*score)).sum();
    let again = ratings.iter().filter(|(_, again)| *again).count() as f64;

    RatingStats {
        average_rating: (sum as f64 / total * 10.0).round() / 10.0,
        total_ratings: ratings.len() as i64,
        would_play_again_percentage: (again / total * 100.0).round() as i64,
    }
}
