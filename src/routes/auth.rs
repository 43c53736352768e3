use actix_web::web;

use crate::handlers::auth;
use crate::middleware::{AuthRateLimitStores, AuthRateLimiter};

pub fn configure(cfg: &mut web::ServiceConfig, limits: &AuthRateLimitStores) {
    cfg.service(
        web::scope("/auth")
            .service(
                web::resource("/register")
                    .wrap(AuthRateLimiter::registration(limits.registration.clone()))
                    .route(web::post().to(auth::register)),
            )
            .service(
                web::resource("/login")
                    .wrap(AuthRateLimiter::login(limits.login.clone()))
                    .route(web::post().to(auth::login)),
            )
            .route("/me", web::get().to(auth::me)),
    )
    .route("/profile", web::put().to(auth::update_profile));
}
