use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Invitation, InvitationDetail, InvitationInput},
    utils::sql,
};

const INVITATION_COLUMNS: &str = r#"
    id,
    sport_id,
    owner_id,
    venue,
    venue_lat,
    venue_lng,
    start_at,
    duration_hours,
    capacity,
    note,
    is_canceled,
    created_at,
    updated_at
"#;

const DETAIL_SELECT: &str = r#"
    SELECT
        i.id,
        i.sport_id,
        i.owner_id,
        i.venue,
        i.venue_lat,
        i.venue_lng,
        i.start_at,
        i.duration_hours,
        i.capacity,
        i.note,
        i.is_canceled,
        i.created_at,
        i.updated_at,
        s.name AS sport_name,
        s.slug AS sport_slug,
        u.display_name AS owner_display_name,
        (
            SELECT COUNT(*)
            FROM invitation_participants p
            WHERE p.invitation_id = i.id
        ) AS participant_count
    FROM
        invitations i
        INNER JOIN sports s ON s.id = i.sport_id
        INNER JOIN users u ON u.id = i.owner_id
"#;

#[derive(Clone)]
pub struct InvitationRepository {
    pool: PgPool,
}

impl InvitationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Expects input already passed through `validation::validate_invitation`.
    pub async fn create(&self, owner_id: Uuid, input: &InvitationInput) -> Result<Invitation> {
        let now = Utc::now();
        let invitation = sqlx::query_as::<_, Invitation>(&sql(&format!(
            r#"
            INSERT INTO
                invitations (
                    id,
                    sport_id,
                    owner_id,
                    venue,
                    venue_lat,
                    venue_lng,
                    start_at,
                    duration_hours,
                    capacity,
                    note,
                    is_canceled,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, FALSE, ?, ?)
            RETURNING
                {}
            "#,
            INVITATION_COLUMNS
        )))
        .bind(Uuid::new_v4())
        .bind(input.sport_id)
        .bind(owner_id)
        .bind(&input.venue)
        .bind(input.venue_lat)
        .bind(input.venue_lng)
        .bind(input.start_at)
        .bind(&input.duration_hours)
        .bind(input.capacity)
        .bind(&input.note)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        log::info!(
            "Invitation {} created by user {}",
            invitation.id,
            owner_id
        );

        Ok(invitation)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Invitation>> {
        let invitation = sqlx::query_as::<_, Invitation>(&sql(&format!(
            r#"
            SELECT
                {}
            FROM
                invitations
            WHERE
                id = ?
            "#,
            INVITATION_COLUMNS
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    pub async fn find_detail_by_id(&self, id: Uuid) -> Result<Option<InvitationDetail>> {
        let detail = sqlx::query_as::<_, InvitationDetail>(&sql(&format!(
            r#"
            {}
            WHERE
                i.id = ?
            "#,
            DETAIL_SELECT
        )))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(detail)
    }

    /// Every invitation still open to join: not cancelled and starting at or
    /// after `now`, soonest first. Search and date refinement happen in
    /// `services::feed`.
    pub async fn list_feed(&self, now: DateTime<Utc>) -> Result<Vec<InvitationDetail>> {
        let invitations = sqlx::query_as::<_, InvitationDetail>(&sql(&format!(
            r#"
            {}
            WHERE
                i.is_canceled = FALSE
                AND i.start_at >= ?
            ORDER BY
                i.start_at ASC
            "#,
            DETAIL_SELECT
        )))
        .bind(now)
        .fetch_all(&self.pool)
        .await?;

        Ok(invitations)
    }

    pub async fn list_by_owner(&self, owner_id: Uuid) -> Result<Vec<InvitationDetail>> {
        let invitations = sqlx::query_as::<_, InvitationDetail>(&sql(&format!(
            r#"
            {}
            WHERE
                i.owner_id = ?
            ORDER BY
                i.start_at DESC
            "#,
            DETAIL_SELECT
        )))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invitations)
    }

    /// Invitations the user registered for, most recently joined first.
    pub async fn list_joined_by_user(&self, user_id: Uuid) -> Result<Vec<InvitationDetail>> {
        let invitations = sqlx::query_as::<_, InvitationDetail>(&sql(&format!(
            r#"
            {}
                INNER JOIN invitation_participants jp ON jp.invitation_id = i.id
            WHERE
                jp.user_id = ?
            ORDER BY
                jp.created_at DESC
            "#,
            DETAIL_SELECT
        )))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(invitations)
    }

    pub async fn update(&self, id: Uuid, input: &InvitationInput) -> Result<Option<Invitation>> {
        let invitation = sqlx::query_as::<_, Invitation>(&sql(&format!(
            r#"
            UPDATE invitations
            SET
                sport_id = ?,
                venue = ?,
                venue_lat = ?,
                venue_lng = ?,
                start_at = ?,
                duration_hours = ?,
                capacity = ?,
                note = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                {}
            "#,
            INVITATION_COLUMNS
        )))
        .bind(input.sport_id)
        .bind(&input.venue)
        .bind(input.venue_lat)
        .bind(input.venue_lng)
        .bind(input.start_at)
        .bind(&input.duration_hours)
        .bind(input.capacity)
        .bind(&input.note)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invitation)
    }

    /// Soft delete. Returns `None` when the invitation is missing or was
    /// already cancelled.
    pub async fn cancel(&self, id: Uuid) -> Result<Option<Invitation>> {
        let invitation = sqlx::query_as::<_, Invitation>(&sql(&format!(
            r#"
            UPDATE invitations
            SET
                is_canceled = TRUE,
                updated_at = ?
            WHERE
                id = ?
                AND is_canceled = FALSE
            RETURNING
                {}
            "#,
            INVITATION_COLUMNS
        )))
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(invitation) = &invitation {
            log::info!("Invitation {} cancelled", invitation.id);
        }

        Ok(invitation)
    }
}
