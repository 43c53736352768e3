use actix_web::HttpResponse;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
        }
    }

    pub fn success_with_message(data: Option<T>, message: &str) -> Self {
        Self {
            success: true,
            data,
            message: Some(message.to_string()),
        }
    }

    // Error with data (e.g., validation errors)
    pub fn error_with_data(data: T, message: &str) -> Self {
        Self {
            success: false,
            data: Some(data),
            message: Some(message.to_string()),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> HttpResponse {
        HttpResponse::Ok().json(Self::success(data))
    }

    pub fn created(data: T) -> HttpResponse {
        HttpResponse::Created().json(Self::success(data))
    }

    pub fn ok_with_message(data: T, message: &str) -> HttpResponse {
        HttpResponse::Ok().json(Self::success_with_message(Some(data), message))
    }
}

impl ApiResponse<()> {
    pub fn error(message: &str) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.to_string()),
        }
    }

    pub fn success_message(message: &str) -> HttpResponse {
        HttpResponse::Ok().json(Self::success_with_message(None, message))
    }
}
