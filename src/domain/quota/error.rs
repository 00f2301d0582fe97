use super::gate::QuotaDenial;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum QuotaServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("quota denied: {0}")]
    QuotaDenied(QuotaDenial),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Repository failures surface as dependency errors.
impl From<AppError> for QuotaServiceError {
    fn from(err: AppError) -> Self {
        QuotaServiceError::Dependency(err.to_string())
    }
}

impl From<QuotaServiceError> for AppError {
    fn from(err: QuotaServiceError) -> Self {
        match err {
            QuotaServiceError::QuotaDenied(denial) => {
                AppError::PaymentRequired(format!("{}. Upgrade your plan to continue.", denial))
            }
            QuotaServiceError::Dependency(msg) => AppError::Internal(msg),
            QuotaServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
