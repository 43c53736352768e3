use actix_web::web;

use crate::handlers::{comments, invitations, participants};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/invitations")
            .route("", web::get().to(invitations::feed))
            .route("", web::post().to(invitations::create_invitation))
            // Fixed segments go before "/{id}"
            .route("/mine", web::get().to(invitations::my_invitations))
            .route("/joined", web::get().to(invitations::joined_invitations))
            .route("/{id}", web::get().to(invitations::get_invitation))
            .route("/{id}", web::put().to(invitations::update_invitation))
            .route("/{id}/cancel", web::post().to(invitations::cancel_invitation))
            .route("/{id}/join", web::post().to(participants::join_invitation))
            .route("/{id}/leave", web::post().to(participants::leave_invitation))
            .route(
                "/{id}/participants",
                web::get().to(participants::list_participants),
            )
            .route("/{id}/comments", web::get().to(comments::list_comments))
            .route("/{id}/comments", web::post().to(comments::post_comment)),
    );
}
