use anyhow::{Result, anyhow};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::database::models::Sport;
use crate::database::repositories::SportRepository;

const CATALOG_TTL: Duration = Duration::from_secs(5 * 60);

/// Active sports, cached for five minutes. The list changes only through
/// migrations, so a short TTL is the only invalidation needed.
#[derive(Clone)]
pub struct SportCatalog {
    repository: SportRepository,
    cache: Cache<(), Arc<Vec<Sport>>>,
}

impl SportCatalog {
    pub fn new(repository: SportRepository) -> Self {
        Self {
            repository,
            cache: Cache::builder()
                .max_capacity(1)
                .time_to_live(CATALOG_TTL)
                .build(),
        }
    }

    pub async fn active_sports(&self) -> Result<Arc<Vec<Sport>>> {
        let repository = self.repository.clone();
        self.cache
            .try_get_with((), async move {
                log::debug!("Loading sport catalog");
                repository.list_active().await.map(Arc::new)
            })
            .await
            .map_err(|e| anyhow!("Failed to load sports: {}", e))
    }

    pub async fn find_active(&self, sport_id: Uuid) -> Result<Option<Sport>> {
        let sports = self.active_sports().await?;
        Ok(sports.iter().find(|sport| sport.id == sport_id).cloned())
    }
}
