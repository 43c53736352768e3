use actix_web::{HttpResponse, web};

use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::SportCatalog;

pub async fn list_sports(catalog: web::Data<SportCatalog>) -> Result<HttpResponse, AppError> {
    let sports = catalog.active_sports().await?;

    Ok(ApiResponse::ok(sports.as_slice()))
}
