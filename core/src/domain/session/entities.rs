use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::errors::SessionError;
use crate::domain::food_analysis::entities::FoodAnalysisResult;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Payment,
    Onboarding,
    Welcome,
    Analysis,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Payment => "payment",
            Mode::Onboarding => "onboarding",
            Mode::Welcome => "welcome",
            Mode::Analysis => "analysis",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Goal {
    LoseWeight,
    GainMass,
    Define,
    Custom(String),
}

impl Goal {
    pub const PRESETS: [Goal; 3] = [Goal::LoseWeight, Goal::GainMass, Goal::Define];

    /// Maps a preset label (any case) to its variant; anything else non-blank is a custom goal.
    pub fn parse(raw: &str) -> Result<Self, SessionError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionError::EmptyGoal);
        }

        Ok(Self::PRESETS
            .into_iter()
            .find(|preset| preset.as_str().eq_ignore_ascii_case(trimmed))
            .unwrap_or_else(|| Goal::Custom(trimmed.to_string())))
    }

    pub fn as_str(&self) -> &str {
        match self {
            Goal::LoseWeight => "Emagrecer",
            Goal::GainMass => "Ganhar Massa",
            Goal::Define => "Definir",
            Goal::Custom(goal) => goal,
        }
    }
}

impl TryFrom<String> for Goal {
    type Error = SessionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Goal::parse(&value)
    }
}

impl From<Goal> for String {
    fn from(goal: Goal) -> Self {
        goal.as_str().to_string()
    }
}

/// Analysis currently awaiting the external call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InFlight {
    Initial,
    /// Keeps the result being corrected so a failed correction can restore it.
    Correction { previous: FoodAnalysisResult },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    LoadingInitial,
    LoadingCorrection,
}

/// Ephemeral per-session UI state. Only mutated through [`SessionState::reduce`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub(super) mode: Mode,
    pub(super) user_goal: Option<Goal>,
    pub(super) current: Option<FoodAnalysisResult>,
    pub(super) in_flight: Option<InFlight>,
    pub(super) error: Option<String>,
}

impl SessionState {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn phase(&self) -> Phase {
        match self.in_flight {
            None => Phase::Idle,
            Some(InFlight::Initial) => Phase::LoadingInitial,
            Some(InFlight::Correction { .. }) => Phase::LoadingCorrection,
        }
    }

    pub fn user_goal(&self) -> Option<&Goal> {
        self.user_goal.as_ref()
    }

    /// Result on display. Hidden while an analysis is loading.
    pub fn current(&self) -> Option<&FoodAnalysisResult> {
        self.current.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
