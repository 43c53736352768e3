use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::{
    models::{Rating, RatingInput, ReceivedRating},
    utils::sql,
};

#[derive(Clone)]
pub struct RatingRepository {
    pool: PgPool,
}

impl RatingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A second rating for the same (invitation, rater, rated) triple fails
    /// on the unique constraint.
    pub async fn create(&self, rater_id: Uuid, input: &RatingInput) -> Result<Rating> {
        let rating = sqlx::query_as::<_, Rating>(&sql(r#"
            INSERT INTO
                user_ratings (
                    id,
                    invitation_id,
                    rater_id,
                    rated_user_id,
                    rating,
                    comment,
                    would_play_again,
                    created_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                invitation_id,
                rater_id,
                rated_user_id,
                rating,
                comment,
                would_play_again,
                created_at
        "#))
        .bind(Uuid::new_v4())
        .bind(input.invitation_id)
        .bind(rater_id)
        .bind(input.rated_user_id)
        .bind(input.rating)
        .bind(&input.comment)
        .bind(input.would_play_again.unwrap_or(false))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(rating)
    }

    pub async fn list_received(&self, user_id: Uuid) -> Result<Vec<ReceivedRating>> {
        let ratings = sqlx::query_as::<_, ReceivedRating>(&sql(r#"
            SELECT
                r.id,
                r.invitation_id,
                r.rater_id,
                r.rated_user_id,
                r.rating,
                r.comment,
                r.would_play_again,
                r.created_at,
                u.display_name AS rater_display_name,
                u.avatar_url AS rater_avatar_url,
                s.name AS sport_name,
                i.venue,
                i.start_at
            FROM
                user_ratings r
                INNER JOIN users u ON u.id = r.rater_id
                INNER JOIN invitations i ON i.id = r.invitation_id
                INNER JOIN sports s ON s.id = i.sport_id
            WHERE
                r.rated_user_id = ?
            ORDER BY
                r.created_at DESC
        "#))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(ratings)
    }

    /// `(rating, would_play_again)` pairs for `membership::rating_stats`.
    pub async fn stats_rows(&self, user_id: Uuid) -> Result<Vec<(i32, bool)>> {
        let rows = sqlx::query_as::<_, (i32, bool)>(&sql(r#"
            SELECT
                rating,
                would_play_again
            FROM
                user_ratings
            WHERE
                rated_user_id = ?
        "#))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
