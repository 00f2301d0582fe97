pub mod plan;
pub mod profile;
pub mod quota;
pub mod shared;
pub mod usage;
