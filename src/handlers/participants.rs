use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::database::repositories::{InvitationRepository, ParticipantRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;

const MAX_BATCH_IDS: usize = 100;

#[derive(Debug, Deserialize)]
pub struct IdsQuery {
    /// Comma separated invitation ids
    pub ids: Option<String>,
}

/// Parses `a,b,c` into ids, ignoring blanks and duplicates.
pub fn parse_ids(raw: Option<&str>) -> Result<Vec<Uuid>, AppError> {
    let mut ids = Vec::new();

    for part in raw.unwrap_or_default().split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let id = Uuid::parse_str(part)
            .map_err(|_| AppError::BadRequest(format!("Invalid invitation id: {}", part)))?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.len() > MAX_BATCH_IDS {
        return Err(AppError::BadRequest(format!(
            "At most {} invitation ids per request",
            MAX_BATCH_IDS
        )));
    }

    Ok(ids)
}

pub async fn join_invitation(
    claims: Claims,
    participants: web::Data<ParticipantRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let invitation_id = path.into_inner();

    let participant = participants
        .join(invitation_id, claims.user_id(), Utc::now())
        .await?
        .into_result()?;

    Ok(ApiResponse::created(participant))
}

pub async fn leave_invitation(
    claims: Claims,
    participants: web::Data<ParticipantRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let invitation_id = path.into_inner();
    let user_id = claims.user_id();

    if !participants.leave(invitation_id, user_id).await? {
        return Err(AppError::NotFound(
            "You have not joined this invitation".to_string(),
        ));
    }

    log::info!("User {} left invitation {}", user_id, invitation_id);

    Ok(ApiResponse::success_message("You have left the invitation"))
}

pub async fn list_participants(
    _claims: Claims,
    invitations: web::Data<InvitationRepository>,
    participants: web::Data<ParticipantRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let invitation_id = path.into_inner();

    if invitations.find_by_id(invitation_id).await?.is_none() {
        return Err(AppError::NotFound("Invitation not found".to_string()));
    }

    let list = participants.list_for_invitation(invitation_id).await?;

    Ok(ApiResponse::ok(list))
}

pub async fn participant_counts(
    participants: web::Data<ParticipantRepository>,
    query: web::Query<IdsQuery>,
) -> Result<HttpResponse, AppError> {
    let ids = parse_ids(query.ids.as_deref())?;
    let counts = participants.counts_for(&ids).await?;

    Ok(ApiResponse::ok(counts))
}

pub async fn my_participation(
    claims: Claims,
    participants: web::Data<ParticipantRepository>,
    query: web::Query<IdsQuery>,
) -> Result<HttpResponse, AppError> {
    let ids = parse_ids(query.ids.as_deref())?;
    let joined = participants.joined_map(claims.user_id(), &ids).await?;

    Ok(ApiResponse::ok(joined))
}
