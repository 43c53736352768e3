#![allow(dead_code)]

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use fake::Fake;
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::Name;
use sqlx::PgPool;
use std::sync::Once;
use uuid::Uuid;

use sportly::database::lazy_pool;
use sportly::database::models::{Invitation, InvitationInput, User};
use sportly::services::auth::generate_token;
use sportly::{AppState, Config, InvitationRepository, UserRepository};

pub const FUTSAL_ID: &str = "6f1d4c3a-0b1e-4f7a-9a51-1c2d3e4f5a01";
pub const BADMINTON_ID: &str = "6f1d4c3a-0b1e-4f7a-9a51-1c2d3e4f5a03";

static INIT: Once = Once::new();

pub fn setup_test_env() {
    INIT.call_once(|| {
        let _ = env_logger::builder().is_test(true).try_init();
    });
}

pub fn sport_id(id: &str) -> Uuid {
    Uuid::parse_str(id).unwrap()
}

/// App state over a pool that never connects. Only use it for requests that
/// are answered before reaching the database.
pub fn offline_state() -> AppState {
    setup_test_env();
    let config = Config::test_config().unwrap();
    let pool = lazy_pool(&config.database_url).unwrap();
    AppState::new(pool, config).unwrap()
}

pub fn state_for(pool: PgPool) -> AppState {
    setup_test_env();
    AppState::new(pool, Config::test_config().unwrap()).unwrap()
}

pub fn fake_user() -> User {
    let email: String = SafeEmail().fake();
    let name: String = Name().fake();
    User::new(email.to_lowercase(), "not-a-real-hash".to_string(), name)
}

pub fn bearer(user: &User) -> (String, String) {
    let token = generate_token(user, &Config::test_config().unwrap()).unwrap();
    ("Authorization".to_string(), format!("Bearer {}", token))
}

pub async fn create_user(pool: &PgPool) -> User {
    UserRepository::new(pool.clone())
        .create_user(&fake_user())
        .await
        .unwrap()
}

pub fn invitation_input(sport: &str, start_at: DateTime<Utc>, capacity: i32) -> InvitationInput {
    InvitationInput {
        sport_id: sport_id(sport),
        venue: "GOR Senayan".to_string(),
        venue_lat: None,
        venue_lng: None,
        start_at,
        duration_hours: BigDecimal::from(2),
        capacity,
        note: None,
    }
}

pub async fn create_invitation(
    pool: &PgPool,
    owner: &User,
    start_at: DateTime<Utc>,
    capacity: i32,
) -> Invitation {
    InvitationRepository::new(pool.clone())
        .create(owner.id, &invitation_input(BADMINTON_ID, start_at, capacity))
        .await
        .unwrap()
}
