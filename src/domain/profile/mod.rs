pub mod model;

pub use model::{Profile, SubscriptionStatus};
