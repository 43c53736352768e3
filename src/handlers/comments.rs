use actix_web::{HttpResponse, web};
use uuid::Uuid;

use crate::database::models::CommentInput;
use crate::database::repositories::{
    CommentRepository, InvitationRepository, ParticipantRepository,
};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;
use crate::services::membership::{Membership, ensure_can_comment};
use crate::services::validation::validate_comment;

pub async fn list_comments(
    _claims: Claims,
    invitations: web::Data<InvitationRepository>,
    comments: web::Data<CommentRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let invitation_id = path.into_inner();

    if invitations.find_by_id(invitation_id).await?.is_none() {
        return Err(AppError::NotFound("Invitation not found".to_string()));
    }

    let list = comments.list_for_invitation(invitation_id).await?;

    Ok(ApiResponse::ok(list))
}

pub async fn post_comment(
    claims: Claims,
    invitations: web::Data<InvitationRepository>,
    participants: web::Data<ParticipantRepository>,
    comments: web::Data<CommentRepository>,
    path: web::Path<Uuid>,
    input: web::Json<CommentInput>,
) -> Result<HttpResponse, AppError> {
    let invitation_id = path.into_inner();
    let user_id = claims.user_id();

    let invitation = invitations
        .find_by_id(invitation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

    let is_participant = participants.is_participant(invitation_id, user_id).await?;
    ensure_can_comment(Membership::new(&invitation, user_id, is_participant))?;

    let content = validate_comment(input.into_inner())?;
    let comment = comments.create(invitation_id, user_id, &content).await?;

    Ok(ApiResponse::created(comment))
}
