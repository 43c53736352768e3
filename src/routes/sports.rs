use actix_web::web;

use crate::handlers::sports;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/sports", web::get().to(sports::list_sports));
}
