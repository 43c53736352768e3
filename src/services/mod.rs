pub mod auth;
pub mod feed;
pub mod geocoding;
pub mod membership;
pub mod registration;
pub mod sanitization;
pub mod sport_catalog;
pub mod user_context;
pub mod validation;

pub use auth::{AuthService, Claims};
pub use geocoding::GeocodingClient;
pub use sport_catalog::SportCatalog;
pub use user_context::UserContext;
