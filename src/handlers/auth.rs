use actix_web::{HttpResponse, web};

use crate::database::models::{CreateUserInput, LoginInput, UpdateProfileInput, UserInfo};
use crate::database::repositories::UserRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::validation::{validate_profile, validate_registration};
use crate::services::{AuthService, UserContext};

pub async fn register(
    auth_service: web::Data<AuthService>,
    request: web::Json<CreateUserInput>,
) -> Result<HttpResponse, AppError> {
    let request = validate_registration(request.into_inner())?;

    let response = auth_service.register(request).await.map_err(|e| {
        log::warn!("Failed to register user: {}", e);
        e
    })?;

    Ok(ApiResponse::created(response))
}

pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginInput>,
) -> Result<HttpResponse, AppError> {
    let response = auth_service.login(request.into_inner()).await?;

    Ok(ApiResponse::ok(response))
}

pub async fn me(user_context: UserContext) -> Result<HttpResponse, AppError> {
    Ok(ApiResponse::ok(UserInfo::from(user_context.user)))
}

pub async fn update_profile(
    user_context: UserContext,
    user_repository: web::Data<UserRepository>,
    input: web::Json<UpdateProfileInput>,
) -> Result<HttpResponse, AppError> {
    let input = validate_profile(input.into_inner())?;
    let user_id = user_context.user_id();

    let user = user_repository
        .update_profile(user_id, &input)
        .await
        .map_err(|e| {
            log::error!("Failed to update profile for user {}: {}", user_id, e);
            AppError::from(e)
        })?
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    Ok(ApiResponse::ok_with_message(
        UserInfo::from(user),
        "Profile updated",
    ))
}
