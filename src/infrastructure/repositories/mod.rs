pub mod profile_repository;
pub mod usage_repository;

pub use profile_repository::{ProfileRecord, ProfileRepository};
pub use usage_repository::UsageRepository;
