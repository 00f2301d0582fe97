pub mod model;

pub use model::UsageCounters;
