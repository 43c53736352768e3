//! Capacity-gated registration.
//!
//! `check_join` is evaluated by `ParticipantRepository::join` inside the same
//! transaction that inserts the registration, while the invitation row is
//! locked, so two concurrent joins can never both pass the capacity check.

use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRejection {
    #[error("Invitation not found")]
    NotFound,
    #[error("This invitation has been cancelled")]
    Cancelled,
    #[error("This invitation has already started")]
    AlreadyStarted,
    #[error("You have already joined this invitation")]
    AlreadyJoined,
    #[error("This invitation is full ({capacity} participants)")]
    Full { capacity: i32 },
}

/// State of an invitation as seen by a join attempt.
#[derive(Debug, Clone, Copy)]
pub struct JoinSnapshot {
    pub capacity: i32,
    pub participant_count: i64,
    pub already_joined: bool,
    pub is_canceled: bool,
    pub start_at: DateTime<Utc>,
}

pub fn check_join(snapshot: &JoinSnapshot, now: DateTime<Utc>) -> Result<(), JoinRejection> {
    if snapshot.is_canceled {
        return Err(JoinRejection::Cancelled);
    }
    if snapshot.start_at < now {
        return Err(JoinRejection::AlreadyStarted);
    }
    if snapshot.already_joined {
        return Err(JoinRejection::AlreadyJoined);
    }
    if snapshot.participant_count >= i64::from(snapshot.capacity) {
        return Err(JoinRejection::Full {
            capacity: snapshot.capacity,
        });
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub enum JoinOutcome<T> {
    Joined(T),
    Rejected(JoinRejection),
}

impl<T> JoinOutcome<T> {
    pub fn into_result(self) -> Result<T, JoinRejection> {
        match self {
            JoinOutcome::Joined(value) => Ok(value),
            JoinOutcome::Rejected(rejection) => Err(rejection),
        }
    }
}
