pub mod availability;
pub mod error;
pub mod gate;
pub mod service;
pub mod summary;

pub use availability::{available_generations_today, available_pro_features_today};
pub use error::QuotaServiceError;
pub use gate::{
    can_generate_dialog, can_save_dialog, can_use_pro_features, check_generate_dialog,
    check_save_dialog, check_use_pro_features, QuotaDenial,
};
pub use service::{QuotaService, QuotaServiceApi};
pub use summary::{usage_summary, GateDecision, Gates, QuotaDimension, SavedDialogs, UsageSummary};
