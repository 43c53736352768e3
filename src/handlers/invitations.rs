use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{Invitation, InvitationInput};
use crate::database::repositories::{InvitationRepository, ParticipantRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::feed::{self, FeedFilter, FeedQuery};
use crate::services::membership::{ensure_capacity_covers, ensure_editable, ensure_owner};
use crate::services::validation::validate_invitation;
use crate::services::{Claims, SportCatalog};

async fn load_invitation(
    repository: &InvitationRepository,
    invitation_id: Uuid,
) -> Result<Invitation, AppError> {
    repository
        .find_by_id(invitation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))
}

/// Upcoming invitations, refined by `search`, `sport` and `date`.
pub async fn feed(
    config: web::Data<Config>,
    repository: web::Data<InvitationRepository>,
    query: web::Query<FeedQuery>,
) -> Result<HttpResponse, AppError> {
    let filter = FeedFilter::try_from(query.into_inner()).map_err(AppError::BadRequest)?;
    let now = Utc::now().with_timezone(&config.feed_offset()?);

    let invitations = repository.list_feed(now.with_timezone(&Utc)).await.map_err(|e| {
        log::error!("Failed to load invitation feed: {}", e);
        AppError::from(e)
    })?;
    let fetched = invitations.len();

    let invitations = feed::apply(invitations, &filter, now);
    if filter.is_active() {
        log::debug!("Feed filter kept {} of {} invitations", invitations.len(), fetched);
    }

    Ok(ApiResponse::ok(invitations))
}

pub async fn create_invitation(
    claims: Claims,
    catalog: web::Data<SportCatalog>,
    repository: web::Data<InvitationRepository>,
    input: web::Json<InvitationInput>,
) -> Result<HttpResponse, AppError> {
    let input = input.into_inner();
    let sport = catalog.find_active(input.sport_id).await?;
    let input = validate_invitation(input, sport.as_ref(), Utc::now())?;

    let invitation = repository.create(claims.user_id(), &input).await?;
    let detail = repository
        .find_detail_by_id(invitation.id)
        .await?
        .ok_or_else(AppError::internal_server_error)?;

    Ok(ApiResponse::created(detail))
}

pub async fn get_invitation(
    repository: web::Data<InvitationRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let invitation = repository
        .find_detail_by_id(path.into_inner())
        .await?
        .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

    Ok(ApiResponse::ok(invitation))
}

pub async fn my_invitations(
    claims: Claims,
    repository: web::Data<InvitationRepository>,
) -> Result<HttpResponse, AppError> {
    let invitations = repository.list_by_owner(claims.user_id()).await?;

    Ok(ApiResponse::ok(invitations))
}

pub async fn joined_invitations(
    claims: Claims,
    repository: web::Data<InvitationRepository>,
) -> Result<HttpResponse, AppError> {
    let invitations = repository.list_joined_by_user(claims.user_id()).await?;

    Ok(ApiResponse::ok(invitations))
}

pub async fn update_invitation(
    claims: Claims,
    catalog: web::Data<SportCatalog>,
    repository: web::Data<InvitationRepository>,
    participants: web::Data<ParticipantRepository>,
    path: web::Path<Uuid>,
    input: web::Json<InvitationInput>,
) -> Result<HttpResponse, AppError> {
    let invitation_id = path.into_inner();
    let now = Utc::now();

    let invitation = load_invitation(&repository, invitation_id).await?;
    ensure_owner(&invitation, claims.user_id())?;
    ensure_editable(&invitation, now)?;

    let input = input.into_inner();
    let sport = catalog.find_active(input.sport_id).await?;
    let input = validate_invitation(input, sport.as_ref(), now)?;

    let joined = participants.count_for(invitation_id).await?;
    ensure_capacity_covers(input.capacity, joined)?;

    repository
        .update(invitation_id, &input)
        .await?
        .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

    let detail = repository
        .find_detail_by_id(invitation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

    log::info!("Invitation {} updated by user {}", invitation_id, claims.user_id());

    Ok(ApiResponse::ok_with_message(detail, "Invitation updated"))
}

pub async fn cancel_invitation(
    claims: Claims,
    repository: web::Data<InvitationRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let invitation_id = path.into_inner();

    let invitation = load_invitation(&repository, invitation_id).await?;
    ensure_owner(&invitation, claims.user_id())?;

    if invitation.is_canceled {
        return Err(AppError::BadRequest(
            "This invitation has already been cancelled".to_string(),
        ));
    }

    let invitation = repository.cancel(invitation_id).await?.ok_or_else(|| {
        AppError::BadRequest("This invitation has already been cancelled".to_string())
    })?;

    Ok(ApiResponse::ok_with_message(invitation, "Invitation cancelled"))
}
