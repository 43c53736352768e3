use actix_web::{FromRequest, HttpRequest, dev::Payload, web::Data};
use anyhow::{Result, anyhow};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::{AuthResponse, CreateUserInput, LoginInput, User};
use crate::database::repositories::UserRepository;
use crate::error::AppError;
use crate::services::sanitization::sanitize_email;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid, // user id
    pub email: String,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_ref()),
        &Validation::new(Algorithm::HS256),
    )?;

    Ok(token_data.claims)
}

/// Claims from the `Authorization: Bearer` header, if present and valid.
pub fn claims_from_request(req: &HttpRequest) -> Option<Claims> {
    let config = req.app_data::<Data<Config>>()?;
    let token = req
        .headers()
        .get("Authorization")?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")?;

    decode_token(token, &config.jwt_secret).ok()
}

impl FromRequest for Claims {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(claims_from_request(req).ok_or(AppError::Unauthorized))
    }
}

#[derive(Clone)]
pub struct AuthService {
    user_repository: UserRepository,
    config: Config,
}

impl AuthService {
    pub fn new(user_repository: UserRepository, config: Config) -> Self {
        Self {
            user_repository,
            config,
        }
    }

    /// Expects input already passed through `validation::validate_registration`.
    pub async fn register(&self, request: CreateUserInput) -> Result<AuthResponse, AppError> {
        if self.user_repository.email_exists(&request.email).await? {
            return Err(AppError::Conflict("Email already exists".to_string()));
        }

        let password_hash = hash(&request.password, DEFAULT_COST)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;

        let user = User::new(request.email, password_hash, request.display_name);
        let user = self.user_repository.create_user(&user).await?;

        let token = self.generate_token(&user)?;

        log::info!("Registered user {}", user.id);

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub async fn login(&self, request: LoginInput) -> Result<AuthResponse, AppError> {
        let email = sanitize_email(&request.email);
        let user = self
            .user_repository
            .find_by_email(&email)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let valid = verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::internal_server_error_message(e.to_string()))?;
        if !valid {
            log::warn!("Failed login attempt for user {}", user.id);
            return Err(AppError::Unauthorized);
        }

        let token = self.generate_token(&user)?;

        Ok(AuthResponse {
            token,
            user: user.into(),
        })
    }

    pub fn generate_token(&self, user: &User) -> Result<String> {
        generate_token(user, &self.config)
    }
}

pub fn generate_token(user: &User, config: &Config) -> Result<String> {
    let expiration = Utc::now()
        .checked_add_signed(Duration::days(config.jwt_expiration_days))
        .ok_or_else(|| anyhow!("Token expiration out of range"))?
        .timestamp() as usize;

    let claims = Claims {
        sub: user.id,
        email: user.email.clone(),
        exp: expiration,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )?;

    Ok(token)
}
