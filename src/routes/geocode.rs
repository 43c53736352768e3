use actix_web::web;

use crate::handlers::geocode;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/geocode/reverse", web::get().to(geocode::reverse_geocode));
}
