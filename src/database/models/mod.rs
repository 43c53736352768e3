pub mod auth;
pub mod comment;
pub mod invitation;
pub mod participant;
pub mod rating;
pub mod sport;
pub mod user;

// Re-export all models for easy importing
pub use auth::*;
pub use comment::*;
pub use invitation::*;
pub use participant::*;
pub use rating::*;
pub use sport::*;
pub use user::*;
