use thiserror::Error;

use super::entities::Mode;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("no credits left and no lifetime access")]
    EntitlementDenied,

    #[error("feature requires the lifetime plan")]
    PremiumRequired,

    #[error("goal must not be empty")]
    EmptyGoal,

    #[error("an analysis is already in progress")]
    AnalysisInProgress,

    #[error("{action} is not allowed in {from} mode")]
    InvalidTransition { from: Mode, action: &'static str },
}
