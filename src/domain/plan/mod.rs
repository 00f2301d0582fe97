pub mod dto;
pub mod model;
pub mod resolver;

pub use dto::PlanResponse;
pub use model::{get_plan_limits, PlanLimits, Tier, UNLIMITED};
pub use resolver::{
    has_stats_access, is_trial_valid, plan_info, resolve_effective_plan, trial_days_remaining,
    voice_provider_for, PlanInfo,
};
