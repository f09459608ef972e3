use thiserror::Error;

use crate::domain::session::SessionError;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("Entitlement denied: {0}")]
    EntitlementDenied(String),

    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid transition from {from} on {action}")]
    InvalidTransition { from: String, action: String },

    #[error("An analysis is already in progress")]
    AnalysisInProgress,

    #[error("Not found")]
    NotFound,
}

impl From<SessionError> for CoreError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::EntitlementDenied => {
                CoreError::EntitlementDenied("no credits left and no lifetime access".to_string())
            }
            SessionError::PremiumRequired => CoreError::EntitlementDenied(
                "document export requires the lifetime plan".to_string(),
            ),
            SessionError::EmptyGoal => CoreError::Validation("goal must not be empty".to_string()),
            SessionError::AnalysisInProgress => CoreError::AnalysisInProgress,
            SessionError::InvalidTransition { from, action } => CoreError::InvalidTransition {
                from: from.to_string(),
                action: action.to_string(),
            },
        }
    }
}

