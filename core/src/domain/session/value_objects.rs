use crate::domain::{
    entitlement::entities::EntitlementState, food_analysis::entities::FoodAnalysisResult,
};

use super::entities::Goal;

/// Everything that can move the session between modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    EntitlementGranted,
    SelectGoal(Goal),
    CaptureImage,
    AnalysisSucceeded(FoodAnalysisResult),
    AnalysisFailed(String),
    StartCorrection,
    CorrectionSucceeded(FoodAnalysisResult),
    CorrectionFailed(String),
    /// "New analysis" and "back" from the result screen.
    NewAnalysis,
    ChangeGoal,
    SelectHistory(FoodAnalysisResult),
    ExportDocument,
    EntitlementDenied,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::EntitlementGranted => "entitlement_granted",
            Action::SelectGoal(_) => "select_goal",
            Action::CaptureImage => "capture_image",
            Action::AnalysisSucceeded(_) => "analysis_succeeded",
            Action::AnalysisFailed(_) => "analysis_failed",
            Action::StartCorrection => "start_correction",
            Action::CorrectionSucceeded(_) => "correction_succeeded",
            Action::CorrectionFailed(_) => "correction_failed",
            Action::NewAnalysis => "new_analysis",
            Action::ChangeGoal => "change_goal",
            Action::SelectHistory(_) => "select_history",
            Action::ExportDocument => "export_document",
            Action::EntitlementDenied => "entitlement_denied",
        }
    }
}

/// Entitlement facts the transition table is guarded by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Guard {
    pub can_consume: bool,
    pub is_paid: bool,
}

impl From<&EntitlementState> for Guard {
    fn from(state: &EntitlementState) -> Self {
        Self {
            can_consume: state.can_consume(),
            is_paid: state.is_paid,
        }
    }
}
