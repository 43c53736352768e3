use anyhow::Result;
use sqlx::PgPool;

use crate::database::{models::Sport, utils::sql};

#[derive(Clone)]
pub struct SportRepository {
    pool: PgPool,
}

impl SportRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_active(&self) -> Result<Vec<Sport>> {
        let sports = sqlx::query_as::<_, Sport>(&sql(r#"
            SELECT
                id,
                name,
                slug,
                min_participants,
                max_participants,
                is_active,
                created_at
            FROM
                sports
            WHERE
                is_active = TRUE
            ORDER BY
                name ASC
        "#))
        .fetch_all(&self.pool)
        .await?;

        Ok(sports)
    }
}
