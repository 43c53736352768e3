//! Input validation for everything users type into Sportly.
//!
//! Each validator returns the sanitized value on success or the full list of
//! field errors, so clients can highlight every problem at once.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::database::models::{
    CommentInput, CreateUserInput, InvitationInput, RatingInput, Sport, UpdateProfileInput,
};
use crate::services::sanitization::{
    is_valid_email, password_problems, sanitize_email, sanitize_optional_text, sanitize_text,
};

pub const VENUE_MAX_LEN: usize = 200;
pub const NOTE_MAX_LEN: usize = 500;
pub const COMMENT_MAX_LEN: usize = 1000;
pub const RATING_COMMENT_MAX_LEN: usize = 500;
pub const DISPLAY_NAME_MAX_LEN: usize = 100;
pub const MIN_CAPACITY: i32 = 2;
pub const MAX_CAPACITY: i32 = 50;
pub const MAX_DURATION_HOURS: i32 = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Default)]
struct Errors(Vec<FieldError>);

impl Errors {
    fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError::new(field, message));
    }

    fn finish<T>(self, value: T) -> Result<T, Vec<FieldError>> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self.0)
        }
    }
}

fn min_duration() -> BigDecimal {
    BigDecimal::from(1) / BigDecimal::from(2)
}

/// Validates an invitation against the selected sport and the current time.
///
/// `sport` is `None` when the referenced sport does not exist or is inactive.
pub fn validate_invitation(
    input: InvitationInput,
    sport: Option<&Sport>,
    now: DateTime<Utc>,
) -> Result<InvitationInput, Vec<FieldError>> {
    let mut errors = Errors::default();

    let venue = sanitize_text(&input.venue);
    if venue.is_empty() {
        errors.add("venue", "Venue is required");
    } else if venue.chars().count() > VENUE_MAX_LEN {
        errors.add("venue", format!("Venue must be at most {} characters", VENUE_MAX_LEN));
    }

    let note = sanitize_optional_text(input.note.as_deref());
    if note
        .as_ref()
        .is_some_and(|note| note.chars().count() > NOTE_MAX_LEN)
    {
        errors.add("note", format!("Note must be at most {} characters", NOTE_MAX_LEN));
    }

    if input.start_at <= now {
        errors.add("start_at", "Start time must be in the future");
    }

    let duration = &input.duration_hours;
    if *duration < min_duration() {
        errors.add("duration_hours", "Duration must be at least 0.5 hours");
    } else if *duration > BigDecimal::from(MAX_DURATION_HOURS) {
        errors.add(
            "duration_hours",
            format!("Duration must be at most {} hours", MAX_DURATION_HOURS),
        );
    } else if duration.round(1) != *duration {
        errors.add("duration_hours", "Duration supports one decimal place");
    }

    if input.capacity < MIN_CAPACITY {
        errors.add(
            "capacity",
            format!("Capacity must be at least {} people", MIN_CAPACITY),
        );
    } else if input.capacity > MAX_CAPACITY {
        errors.add(
            "capacity",
            format!("Capacity must be at most {} people", MAX_CAPACITY),
        );
    }

    match sport {
        Some(sport) => {
            let (min, max) = sport.participant_bounds();
            if input.capacity < min || input.capacity > max {
                errors.add(
                    "capacity",
                    format!("{} needs between {} and {} participants", sport.name, min, max),
                );
            }
        }
        None => errors.add("sport_id", "Select an available sport"),
    }

    if let Some(message) = coordinate_problem(input.venue_lat, input.venue_lng) {
        errors.add("venue_lat", message);
    }

    errors.finish(InvitationInput {
        venue,
        note,
        ..input
    })
}

fn coordinate_problem(lat: Option<f64>, lng: Option<f64>) -> Option<&'static str> {
    match (lat, lng) {
        (None, None) => None,
        (Some(lat), Some(lng)) => validate_coordinates(lat, lng).err(),
        _ => Some("Latitude and longitude must be provided together"),
    }
}

pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), &'static str> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err("Latitude must be between -90 and 90");
    }
    if !(-180.0..=180.0).contains(&lng) {
        return Err("Longitude must be between -180 and 180");
    }
    Ok(())
}

pub fn validate_comment(input: CommentInput) -> Result<String, Vec<FieldError>> {
    let mut errors = Errors::default();

    let content = sanitize_text(&input.content);
    if content.is_empty() {
        errors.add("content", "Message cannot be empty");
    } else if content.chars().count() > COMMENT_MAX_LEN {
        errors.add(
            "content",
            format!("Message must be at most {} characters", COMMENT_MAX_LEN),
        );
    }

    errors.finish(content)
}

pub fn validate_rating(input: RatingInput) -> Result<RatingInput, Vec<FieldError>> {
    let mut errors = Errors::default();

    if !(1..=5).contains(&input.rating) {
        errors.add("rating", "Rating must be between 1 and 5");
    }

    let comment = sanitize_optional_text(input.comment.as_deref());
    if comment
        .as_ref()
        .is_some_and(|comment| comment.chars().count() > RATING_COMMENT_MAX_LEN)
    {
        errors.add(
            "comment",
            format!("Comment must be at most {} characters", RATING_COMMENT_MAX_LEN),
        );
    }

    errors.finish(RatingInput {
        comment,
        would_play_again: Some(input.would_play_again.unwrap_or(false)),
        ..input
    })
}

fn check_display_name(errors: &mut Errors, raw: &str) -> String {
    let display_name = sanitize_text(raw);
    if display_name.is_empty() {
        errors.add("display_name", "Display name is required");
    } else if display_name.chars().count() > DISPLAY_NAME_MAX_LEN {
        errors.add(
            "display_name",
            format!("Display name must be at most {} characters", DISPLAY_NAME_MAX_LEN),
        );
    }
    display_name
}

pub fn validate_registration(input: CreateUserInput) -> Result<CreateUserInput, Vec<FieldError>> {
    let mut errors = Errors::default();

    let email = sanitize_email(&input.email);
    if !is_valid_email(&email) {
        errors.add("email", "Enter a valid email address");
    }

    for problem in password_problems(&input.password) {
        errors.add("password", problem);
    }

    let display_name = check_display_name(&mut errors, &input.display_name);

    errors.finish(CreateUserInput {
        email,
        password: input.password,
        display_name,
    })
}

pub fn validate_profile(input: UpdateProfileInput) -> Result<UpdateProfileInput, Vec<FieldError>> {
    let mut errors = Errors::default();

    let display_name = check_display_name(&mut errors, &input.display_name);

    let avatar_url = input
        .avatar_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());
    if avatar_url
        .as_ref()
        .is_some_and(|url| !(url.starts_with("https://") || url.starts_with("http://")))
    {
        errors.add("avatar_url", "Avatar must be an http(s) URL");
    }

    errors.finish(UpdateProfileInput {
        display_name,
        avatar_url,
    })
}
