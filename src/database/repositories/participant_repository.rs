use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::database::{
    models::{Participant, ParticipantInfo},
    utils::sql,
};
use crate::services::registration::{JoinOutcome, JoinRejection, JoinSnapshot, check_join};

#[derive(Clone)]
pub struct ParticipantRepository {
    pool: PgPool,
}

impl ParticipantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Registers `user_id` for the invitation if it still has room.
    ///
    /// The invitation row is locked with `FOR UPDATE` before counting, so
    /// concurrent joins on the same invitation are serialized and the
    /// capacity check and insert see the same participant count.
    pub async fn join(
        &self,
        invitation_id: Uuid,
        user_id: Uuid,
        now: DateTime<Utc>,
    ) -> Result<JoinOutcome<Participant>> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_as::<_, (i32, bool, DateTime<Utc>)>(&sql(r#"
            SELECT
                capacity,
                is_canceled,
                start_at
            FROM
                invitations
            WHERE
                id = ?
            FOR UPDATE
        "#))
        .bind(invitation_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some((capacity, is_canceled, start_at)) = locked else {
            tx.rollback().await?;
            return Ok(JoinOutcome::Rejected(JoinRejection::NotFound));
        };

        let participant_count = sqlx::query_scalar::<_, i64>(&sql(r#"
            SELECT COUNT(*)
            FROM invitation_participants
            WHERE invitation_id = ?
        "#))
        .bind(invitation_id)
        .fetch_one(&mut *tx)
        .await?;

        let already_joined = sqlx::query_scalar::<_, bool>(&sql(r#"
            SELECT EXISTS (
                SELECT 1
                FROM invitation_participants
                WHERE invitation_id = ? AND user_id = ?
            )
        "#))
        .bind(invitation_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        let snapshot = JoinSnapshot {
            capacity,
            participant_count,
            already_joined,
            is_canceled,
            start_at,
        };

        if let Err(rejection) = check_join(&snapshot, now) {
            tx.rollback().await?;
            log::debug!(
                "Join of invitation {} by user {} rejected: {}",
                invitation_id,
                user_id,
                rejection
            );
            return Ok(JoinOutcome::Rejected(rejection));
        }

        let participant = sqlx::query_as::<_, Participant>(&sql(r#"
            INSERT INTO
                invitation_participants (id, invitation_id, user_id, created_at)
            VALUES
                (?, ?, ?, ?)
            RETURNING
                id,
                invitation_id,
                user_id,
                created_at
        "#))
        .bind(Uuid::new_v4())
        .bind(invitation_id)
        .bind(user_id)
        .bind(now)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        log::info!(
            "User {} joined invitation {} ({}/{})",
            user_id,
            invitation_id,
            participant_count + 1,
            capacity
        );

        Ok(JoinOutcome::Joined(participant))
    }

    /// Returns `false` when the user was not registered.
    pub async fn leave(&self, invitation_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(&sql(r#"
            DELETE FROM invitation_participants
            WHERE
                invitation_id = ?
                AND user_id = ?
        "#))
        .bind(invitation_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn is_participant(&self, invitation_id: Uuid, user_id: Uuid) -> Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(&sql(r#"
            SELECT EXISTS (
                SELECT 1
                FROM invitation_participants
                WHERE invitation_id = ? AND user_id = ?
            )
        "#))
        .bind(invitation_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(exists)
    }

    pub async fn count_for(&self, invitation_id: Uuid) -> Result<i64> {
        let count = sqlx::query_scalar::<_, i64>(&sql(r#"
            SELECT COUNT(*)
            FROM invitation_participants
            WHERE invitation_id = ?
        "#))
        .bind(invitation_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Participant count per invitation. Every requested id is present in the
    /// result, with zero for invitations nobody joined.
    pub async fn counts_for(&self, invitation_ids: &[Uuid]) -> Result<HashMap<Uuid, i64>> {
        if invitation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, (Uuid, i64)>(&sql(r#"
            SELECT
                invitation_id,
                COUNT(*)
            FROM
                invitation_participants
            WHERE
                invitation_id = ANY(?)
            GROUP BY
                invitation_id
        "#))
        .bind(invitation_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut counts: HashMap<Uuid, i64> = invitation_ids.iter().map(|id| (*id, 0)).collect();
        counts.extend(rows);

        Ok(counts)
    }

    /// Whether `user_id` joined each of the given invitations.
    pub async fn joined_map(
        &self,
        user_id: Uuid,
        invitation_ids: &[Uuid],
    ) -> Result<HashMap<Uuid, bool>> {
        if invitation_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let joined: HashSet<Uuid> = sqlx::query_scalar::<_, Uuid>(&sql(r#"
            SELECT
                invitation_id
            FROM
                invitation_participants
            WHERE
                user_id = ?
                AND invitation_id = ANY(?)
        "#))
        .bind(user_id)
        .bind(invitation_ids)
        .fetch_all(&self.pool)
        .await?
        .into_iter()
        .collect();

        Ok(invitation_ids
            .iter()
            .map(|id| (*id, joined.contains(id)))
            .collect())
    }

    pub async fn list_for_invitation(&self, invitation_id: Uuid) -> Result<Vec<ParticipantInfo>> {
        let participants = sqlx::query_as::<_, ParticipantInfo>(&sql(r#"
            SELECT
                p.user_id,
                u.display_name,
                u.avatar_url,
                p.created_at AS joined_at
            FROM
                invitation_participants p
                INNER JOIN users u ON u.id = p.user_id
            WHERE
                p.invitation_id = ?
            ORDER BY
                p.created_at ASC
        "#))
        .bind(invitation_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(participants)
    }
}
