use actix_web::web;

use crate::middleware::AuthRateLimitStores;

pub mod auth;
pub mod geocode;
pub mod invitations;
pub mod participation;
pub mod ratings;
pub mod sports;

pub fn configure(cfg: &mut web::ServiceConfig, auth_limits: &AuthRateLimitStores) {
    cfg.service(
        web::scope("/api/v1")
            .configure(|cfg| auth::configure(cfg, auth_limits))
            .configure(sports::configure)
            .configure(invitations::configure)
            .configure(participation::configure)
            .configure(ratings::configure)
            .configure(geocode::configure),
    );
}
