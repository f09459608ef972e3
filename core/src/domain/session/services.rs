use tracing::debug;

use super::{
    entities::{InFlight, Mode, Phase, SessionState},
    errors::SessionError,
    value_objects::{Action, Guard},
};

/// Transition table of the session: `(Mode, Phase) × Action → Mode`.
///
/// Pure: it decides the next mode without touching session data.
/// `EntitlementDenied` and `PremiumRequired` errors mean the caller must fall back to payment.
pub fn transition(
    mode: Mode,
    phase: Phase,
    action: &Action,
    guard: Guard,
) -> Result<Mode, SessionError> {
    use Action as A;
    use Mode as M;
    use Phase as P;

    let guarded = |to: Mode| {
        if guard.can_consume {
            Ok(to)
        } else {
            Err(SessionError::EntitlementDenied)
        }
    };

    match (mode, phase, action) {
        (M::Analysis, P::LoadingInitial, A::AnalysisSucceeded(_)) => Ok(M::Analysis),
        (M::Analysis, P::LoadingInitial, A::AnalysisFailed(_)) => Ok(M::Welcome),
        (M::Analysis, P::LoadingCorrection, A::CorrectionSucceeded(_) | A::CorrectionFailed(_)) => {
            Ok(M::Analysis)
        }
        (_, P::LoadingInitial | P::LoadingCorrection, _) => Err(SessionError::AnalysisInProgress),

        (_, P::Idle, A::EntitlementDenied) => Ok(M::Payment),
        (M::Payment, P::Idle, A::EntitlementGranted) => Ok(M::Onboarding),
        (M::Onboarding, P::Idle, A::SelectGoal(_)) => Ok(M::Welcome),
        (M::Welcome | M::Analysis, P::Idle, A::CaptureImage) => guarded(M::Analysis),
        (M::Analysis, P::Idle, A::StartCorrection) => Ok(M::Analysis),
        (M::Analysis, P::Idle, A::NewAnalysis) => guarded(M::Welcome),
        (M::Welcome | M::Analysis, P::Idle, A::ChangeGoal) => guarded(M::Onboarding),
        (M::Onboarding | M::Welcome | M::Analysis, P::Idle, A::SelectHistory(_)) => {
            Ok(M::Analysis)
        }
        (current, P::Idle, A::ExportDocument) => {
            if guard.is_paid {
                Ok(current)
            } else {
                Err(SessionError::PremiumRequired)
            }
        }

        (
            from,
            P::Idle,
            A::EntitlementGranted
            | A::SelectGoal(_)
            | A::CaptureImage
            | A::AnalysisSucceeded(_)
            | A::AnalysisFailed(_)
            | A::StartCorrection
            | A::CorrectionSucceeded(_)
            | A::CorrectionFailed(_)
            | A::NewAnalysis
            | A::ChangeGoal
            | A::SelectHistory(_),
        ) => Err(SessionError::InvalidTransition {
            from,
            action: action.name(),
        }),
    }
}

impl SessionState {
    /// Applies `action`, updating mode and session data together.
    ///
    /// A rejected action leaves the state untouched, except for entitlement
    /// failures which force the payment screen.
    pub fn reduce(&mut self, action: Action, guard: Guard) -> Result<(), SessionError> {
        if matches!(action, Action::StartCorrection) && self.current.is_none() {
            return Err(SessionError::InvalidTransition {
                from: self.mode,
                action: action.name(),
            });
        }

        let next = match transition(self.mode, self.phase(), &action, guard) {
            Ok(next) => next,
            Err(e @ (SessionError::EntitlementDenied | SessionError::PremiumRequired)) => {
                debug!(from = %self.mode, action = action.name(), "redirecting to payment");
                self.mode = Mode::Payment;
                return Err(e);
            }
            Err(e) => return Err(e),
        };

        debug!(from = %self.mode, to = %next, action = action.name(), "session transition");

        match action {
            Action::EntitlementGranted | Action::EntitlementDenied | Action::ExportDocument => {}
            Action::SelectGoal(goal) => {
                self.user_goal = Some(goal);
                self.error = None;
            }
            Action::CaptureImage => {
                self.current = None;
                self.error = None;
                self.in_flight = Some(InFlight::Initial);
            }
            Action::AnalysisSucceeded(result) | Action::CorrectionSucceeded(result) => {
                self.current = Some(result);
                self.in_flight = None;
            }
            Action::AnalysisFailed(message) => {
                self.current = None;
                self.in_flight = None;
                self.error = Some(message);
            }
            Action::StartCorrection => {
                if let Some(previous) = self.current.take() {
                    self.in_flight = Some(InFlight::Correction { previous });
                }
                self.error = None;
            }
            Action::CorrectionFailed(message) => {
                if let Some(InFlight::Correction { previous }) = self.in_flight.take() {
                    self.current = Some(previous);
                }
                self.error = Some(message);
            }
            Action::NewAnalysis => {
                self.current = None;
                self.error = None;
            }
            Action::ChangeGoal => {
                self.user_goal = None;
                self.current = None;
                self.error = None;
            }
            Action::SelectHistory(item) => {
                self.current = Some(item);
                self.error = None;
            }
        }

        self.mode = next;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::domain::{
        food_analysis::entities::{FoodAnalysisResult, NutritionalInfo},
        session::entities::Goal,
    };

    const ENTITLED: Guard = Guard {
        can_consume: true,
        is_paid: false,
    };
    const BROKE: Guard = Guard {
        can_consume: false,
        is_paid: false,
    };
    const PAID: Guard = Guard {
        can_consume: true,
        is_paid: true,
    };

    fn result(description: &str) -> FoodAnalysisResult {
        FoodAnalysisResult {
            image_uri: "data:image/jpeg;base64,AAAA".to_string(),
            timestamp: Utc::now(),
            description: description.to_string(),
            nutritional_info: NutritionalInfo {
                calories: "100 kcal".to_string(),
                protein: "1g".to_string(),
                carbs: "2g".to_string(),
                fat: "3g".to_string(),
                weight: None,
                vitamins: None,
                minerals: None,
            },
            suggested_recipe: None,
        }
    }

    fn state_in(mode: Mode) -> SessionState {
        SessionState::new(mode)
    }

    fn showing(description: &str) -> SessionState {
        let mut state = state_in(Mode::Analysis);
        state.current = Some(result(description));
        state
    }

    #[test]
    fn test_happy_path_transitions() {
        let mut state = state_in(Mode::Payment);
        state.reduce(Action::EntitlementGranted, ENTITLED).unwrap();
        assert_eq!(state.mode(), Mode::Onboarding);

        state
            .reduce(Action::SelectGoal(Goal::LoseWeight), ENTITLED)
            .unwrap();
        assert_eq!(state.mode(), Mode::Welcome);
        assert_eq!(state.user_goal(), Some(&Goal::LoseWeight));

        state.reduce(Action::CaptureImage, ENTITLED).unwrap();
        assert_eq!(state.mode(), Mode::Analysis);
        assert!(state.is_loading());

        state
            .reduce(Action::AnalysisSucceeded(result("ok")), ENTITLED)
            .unwrap();
        assert!(!state.is_loading());
        assert_eq!(state.current().unwrap().description, "ok");
    }

    #[test]
    fn test_capture_without_entitlement_redirects_to_payment() {
        let mut state = state_in(Mode::Welcome);
        let error = state.reduce(Action::CaptureImage, BROKE).unwrap_err();
        assert_eq!(error, SessionError::EntitlementDenied);
        assert_eq!(state.mode(), Mode::Payment);
        assert!(!state.is_loading());
    }

    #[test]
    fn test_capture_clears_displayed_result() {
        let mut state = showing("old");
        state.reduce(Action::CaptureImage, ENTITLED).unwrap();
        assert!(state.current().is_none());
    }

    #[test]
    fn test_failed_analysis_returns_to_welcome() {
        let mut state = state_in(Mode::Welcome);
        state.reduce(Action::CaptureImage, ENTITLED).unwrap();
        state
            .reduce(Action::AnalysisFailed("try again".to_string()), ENTITLED)
            .unwrap();
        assert_eq!(state.mode(), Mode::Welcome);
        assert_eq!(state.error(), Some("try again"));
        assert!(!state.is_loading());
    }

    #[test]
    fn test_second_capture_while_loading_is_rejected() {
        let mut state = state_in(Mode::Welcome);
        state.reduce(Action::CaptureImage, ENTITLED).unwrap();

        let before = state.clone();
        assert_eq!(
            state.reduce(Action::CaptureImage, ENTITLED),
            Err(SessionError::AnalysisInProgress)
        );
        assert_eq!(
            state.reduce(Action::EntitlementDenied, ENTITLED),
            Err(SessionError::AnalysisInProgress)
        );
        assert_eq!(state, before);
    }

    #[test]
    fn test_correction_failure_restores_previous_result() {
        let mut state = showing("original");
        state.reduce(Action::StartCorrection, BROKE).unwrap();
        assert!(state.is_loading());
        assert!(state.current().is_none());

        state
            .reduce(Action::CorrectionFailed("nope".to_string()), BROKE)
            .unwrap();
        assert_eq!(state.mode(), Mode::Analysis);
        assert_eq!(state.current().unwrap().description, "original");
        assert_eq!(state.error(), Some("nope"));
    }

    #[test]
    fn test_correction_success_replaces_result() {
        let mut state = showing("original");
        state.reduce(Action::StartCorrection, ENTITLED).unwrap();
        state
            .reduce(Action::CorrectionSucceeded(result("corrected")), ENTITLED)
            .unwrap();
        assert_eq!(state.current().unwrap().description, "corrected");
    }

    #[test]
    fn test_correction_requires_displayed_result() {
        let mut state = state_in(Mode::Analysis);
        assert!(matches!(
            state.reduce(Action::StartCorrection, ENTITLED),
            Err(SessionError::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_navigation_is_guarded() {
        let mut state = showing("x");
        assert_eq!(
            state.reduce(Action::NewAnalysis, BROKE),
            Err(SessionError::EntitlementDenied)
        );
        assert_eq!(state.mode(), Mode::Payment);

        let mut state = showing("x");
        state.reduce(Action::NewAnalysis, ENTITLED).unwrap();
        assert_eq!(state.mode(), Mode::Welcome);
        assert!(state.current().is_none());

        let mut state = showing("x");
        state.user_goal = Some(Goal::Define);
        state.reduce(Action::ChangeGoal, ENTITLED).unwrap();
        assert_eq!(state.mode(), Mode::Onboarding);
        assert!(state.user_goal().is_none());
        assert!(state.current().is_none());
    }

    #[test]
    fn test_select_history_ignores_entitlement() {
        let mut state = state_in(Mode::Welcome);
        state
            .reduce(Action::SelectHistory(result("past")), BROKE)
            .unwrap();
        assert_eq!(state.mode(), Mode::Analysis);
        assert_eq!(state.current().unwrap().description, "past");
    }

    #[test]
    fn test_export_requires_paid() {
        let mut state = showing("x");
        assert_eq!(
            state.reduce(Action::ExportDocument, ENTITLED),
            Err(SessionError::PremiumRequired)
        );
        assert_eq!(state.mode(), Mode::Payment);

        let mut state = showing("x");
        state.reduce(Action::ExportDocument, PAID).unwrap();
        assert_eq!(state.mode(), Mode::Analysis);
    }

    #[test]
    fn test_illegal_pairs_are_rejected() {
        let cases = [
            (Mode::Payment, Action::SelectGoal(Goal::Define)),
            (Mode::Payment, Action::CaptureImage),
            (Mode::Onboarding, Action::EntitlementGranted),
            (Mode::Onboarding, Action::CaptureImage),
            (Mode::Welcome, Action::NewAnalysis),
            (Mode::Welcome, Action::AnalysisSucceeded(result("x"))),
            (Mode::Payment, Action::SelectHistory(result("x"))),
        ];

        for (mode, action) in cases {
            let mut state = state_in(mode);
            assert!(
                matches!(
                    state.reduce(action.clone(), PAID),
                    Err(SessionError::InvalidTransition { .. })
                ),
                "{mode} + {} should be rejected",
                action.name()
            );
            assert_eq!(state.mode(), mode);
        }
    }

    #[test]
    fn test_entitlement_denied_forces_payment_from_any_idle_mode() {
        for mode in [Mode::Onboarding, Mode::Welcome, Mode::Analysis] {
            let mut state = state_in(mode);
            state.reduce(Action::EntitlementDenied, ENTITLED).unwrap();
            assert_eq!(state.mode(), Mode::Payment);
        }
    }

    #[test]
    fn test_goal_parsing() {
        assert_eq!(Goal::parse("emagrecer").unwrap(), Goal::LoseWeight);
        assert_eq!(Goal::parse(" Ganhar Massa ").unwrap(), Goal::GainMass);
        assert_eq!(
            Goal::parse("Correr uma maratona").unwrap(),
            Goal::Custom("Correr uma maratona".to_string())
        );
        assert_eq!(Goal::parse("   "), Err(SessionError::EmptyGoal));
    }
}
