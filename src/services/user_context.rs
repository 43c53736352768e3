use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use futures_util::future::LocalBoxFuture;
use uuid::Uuid;

use crate::database::models::User;
use crate::database::repositories::UserRepository;
use crate::error::AppError;
use crate::services::auth::claims_from_request;

/// The authenticated user, loaded from the database.
///
/// Use `Claims` instead when only the user id is needed.
#[derive(Debug, Clone)]
pub struct UserContext {
    pub user: User,
}

impl UserContext {
    pub fn user_id(&self) -> Uuid {
        self.user.id
    }
}

impl FromRequest for UserContext {
    type Error = AppError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let claims = claims_from_request(req);
        let user_repository = req.app_data::<Data<UserRepository>>().cloned();

        Box::pin(async move {
            let claims = claims.ok_or(AppError::Unauthorized)?;
            let user_repository = user_repository.ok_or_else(|| {
                AppError::internal_server_error_message("User repository not configured")
            })?;

            let user = user_repository
                .find_by_id(claims.user_id())
                .await?
                .ok_or(AppError::Unauthorized)?;

            Ok(UserContext { user })
        })
    }
}
