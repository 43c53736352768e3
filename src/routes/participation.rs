use actix_web::web;

use crate::handlers::participants;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/participation")
            .route("/counts", web::get().to(participants::participant_counts))
            .route("/mine", web::get().to(participants::my_participation)),
    );
}
