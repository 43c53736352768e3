use actix_web::{HttpRequest, HttpResponse, web};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::middleware::RequestIdExt;
use crate::services::validation::validate_coordinates;
use crate::services::{Claims, GeocodingClient};

#[derive(Debug, Deserialize)]
pub struct ReverseQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ReverseGeocodeResponse {
    pub lat: f64,
    pub lng: f64,
    pub address: Option<String>,
}

pub async fn reverse_geocode(
    req: HttpRequest,
    _claims: Claims,
    client: web::Data<GeocodingClient>,
    query: web::Query<ReverseQuery>,
) -> Result<HttpResponse, AppError> {
    let ReverseQuery { lat, lng } = query.into_inner();
    validate_coordinates(lat, lng).map_err(|message| AppError::BadRequest(message.to_string()))?;

    let address = client.reverse(lat, lng).await.map_err(|e| {
        log::warn!(
            "Reverse geocoding {},{} failed: {} (correlation_id={})",
            lat,
            lng,
            e,
            req.correlation_id().unwrap_or_default()
        );
        AppError::from(e)
    })?;

    Ok(ApiResponse::ok(ReverseGeocodeResponse { lat, lng, address }))
}
