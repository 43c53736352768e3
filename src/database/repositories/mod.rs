pub mod comment_repository;
pub mod invitation_repository;
pub mod participant_repository;
pub mod rating_repository;
pub mod sport_repository;
pub mod user_repository;

// Re-export all repositories for easy importing
pub use comment_repository::CommentRepository;
pub use invitation_repository::InvitationRepository;
pub use participant_repository::ParticipantRepository;
pub use rating_repository::RatingRepository;
pub use sport_repository::SportRepository;
pub use user_repository::UserRepository;
