pub mod config;
pub mod database;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod services;

use actix_web::web;
use anyhow::Result;
use sqlx::PgPool;

pub use config::Config;
pub use middleware::AuthRateLimitStores;
pub use database::repositories::{
    CommentRepository, InvitationRepository, ParticipantRepository, RatingRepository,
    SportRepository, UserRepository,
};
pub use services::{AuthService, GeocodingClient, SportCatalog};

/// Everything handlers pull out of `app_data`, built once and cloned into
/// each worker.
#[derive(Clone)]
pub struct AppState {
    pub config: web::Data<Config>,
    pub auth_service: web::Data<AuthService>,
    pub sport_catalog: web::Data<SportCatalog>,
    pub geocoding_client: web::Data<GeocodingClient>,
    pub user_repository: web::Data<UserRepository>,
    pub invitation_repository: web::Data<InvitationRepository>,
    pub participant_repository: web::Data<ParticipantRepository>,
    pub comment_repository: web::Data<CommentRepository>,
    pub rating_repository: web::Data<RatingRepository>,
    pub auth_rate_limits: AuthRateLimitStores,
}

impl AppState {
    pub fn new(pool: PgPool, config: Config) -> Result<Self> {
        let user_repository = UserRepository::new(pool.clone());
        let auth_service = AuthService::new(user_repository.clone(), config.clone());
        let sport_catalog = SportCatalog::new(SportRepository::new(pool.clone()));
        let geocoding_client = GeocodingClient::from_config(&config)?;

        if !geocoding_client.is_configured() {
            log::warn!("GEOCODING_API_KEY not set, reverse geocoding is disabled");
        }

        Ok(Self {
            config: web::Data::new(config),
            auth_service: web::Data::new(auth_service),
            sport_catalog: web::Data::new(sport_catalog),
            geocoding_client: web::Data::new(geocoding_client),
            user_repository: web::Data::new(user_repository),
            invitation_repository: web::Data::new(InvitationRepository::new(pool.clone())),
            participant_repository: web::Data::new(ParticipantRepository::new(pool.clone())),
            comment_repository: web::Data::new(CommentRepository::new(pool.clone())),
            rating_repository: web::Data::new(RatingRepository::new(pool)),
            auth_rate_limits: AuthRateLimitStores::new(),
        })
    }

    /// Registers app data, the root endpoints and the `/api/v1` routes.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.config.clone())
            .app_data(self.auth_service.clone())
            .app_data(self.sport_catalog.clone())
            .app_data(self.geocoding_client.clone())
            .app_data(self.user_repository.clone())
            .app_data(self.invitation_repository.clone())
            .app_data(self.participant_repository.clone())
            .app_data(self.comment_repository.clone())
            .app_data(self.rating_repository.clone())
            .service(handlers::health::hello)
            .service(handlers::health::health)
            .configure(|cfg| routes::configure(cfg, &self.auth_rate_limits));
    }
}
