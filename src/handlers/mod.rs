pub mod auth;
pub mod comments;
pub mod geocode;
pub mod health;
pub mod invitations;
pub mod participants;
pub mod ratings;
pub mod shared;
pub mod sports;
