use actix_web::web;

use crate::handlers::ratings;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/ratings", web::post().to(ratings::submit_rating))
        .service(
            web::scope("/users/{id}")
                .route("/ratings", web::get().to(ratings::received_ratings))
                .route("/rating-stats", web::get().to(ratings::rating_summary)),
        );
}
