use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use crate::database::models::RatingInput;
use crate::database::repositories::{InvitationRepository, ParticipantRepository, RatingRepository};
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::Claims;
use crate::services::membership::{Membership, ensure_can_rate, rating_stats};
use crate::services::validation::validate_rating;

pub async fn submit_rating(
    claims: Claims,
    invitations: web::Data<InvitationRepository>,
    participants: web::Data<ParticipantRepository>,
    ratings: web::Data<RatingRepository>,
    input: web::Json<RatingInput>,
) -> Result<HttpResponse, AppError> {
    let input = validate_rating(input.into_inner())?;
    let rater_id = claims.user_id();

    let invitation = invitations
        .find_by_id(input.invitation_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Invitation not found".to_string()))?;

    let rater = Membership::new(
        &invitation,
        rater_id,
        participants.is_participant(invitation.id, rater_id).await?,
    );
    let rated = Membership::new(
        &invitation,
        input.rated_user_id,
        participants
            .is_participant(invitation.id, input.rated_user_id)
            .await?,
    );
    ensure_can_rate(
        &invitation,
        rater_id,
        input.rated_user_id,
        rater,
        rated,
        Utc::now(),
    )?;

    let rating = ratings
        .create(rater_id, &input)
        .await
        .map_err(|e| match AppError::from(e) {
            AppError::Conflict(_) => AppError::Conflict(
                "You have already rated this player for this invitation".to_string(),
            ),
            other => other,
        })?;

    log::info!(
        "User {} rated user {} for invitation {}",
        rater_id,
        rating.rated_user_id,
        rating.invitation_id
    );

    Ok(ApiResponse::created(rating))
}

pub async fn received_ratings(
    _claims: Claims,
    ratings: web::Data<RatingRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let list = ratings.list_received(path.into_inner()).await?;

    Ok(ApiResponse::ok(list))
}

pub async fn rating_summary(
    _claims: Claims,
    ratings: web::Data<RatingRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let rows = ratings.stats_rows(path.into_inner()).await?;

    Ok(ApiResponse::ok(rating_stats(&rows)))
}
