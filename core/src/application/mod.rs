use std::sync::Arc;

use rand::Rng;
use serde::Serialize;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;

use crate::{
    domain::{
        common::{NutriscanConfig, entities::app_errors::CoreError},
        entitlement::{CardPayment, EntitlementManager, TrialRegistration},
        food_analysis::{
            AnalysisKind, AnalysisPayload, AnalyzeFoodInput, FoodAnalysisPipeline,
            FoodAnalysisResult, ImageCapture, LLMClient, PendingAnalysis,
            helpers::recipe_image_url,
        },
        history::HistoryRingBuffer,
        session::{Action, Goal, Guard, Mode, SessionError, SessionState, transition},
        storage::KeyValueStore,
    },
    infrastructure::{llm::GeminiLLMClient, storage::FileKeyValueStore},
};

/// Goal sent to the model when a result is reached without picking one (history from onboarding).
const FALLBACK_GOAL: &str = "Alimentação equilibrada";
const RECIPE_SEED_RANGE: u32 = 1000;

pub type NutriscanAppService = NutriscanService<FileKeyValueStore, GeminiLLMClient>;

pub fn create_service(config: NutriscanConfig) -> Result<NutriscanAppService, anyhow::Error> {
    let store = FileKeyValueStore::open(&config.storage.path, config.storage.quota_bytes)?;
    let llm_client = GeminiLLMClient::new(&config.llm)?;

    Ok(NutriscanService::new(Arc::new(store), Arc::new(llm_client)))
}

/// What a client needs to render the current screen.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct SessionSnapshot {
    pub mode: Mode,
    pub loading: bool,
    pub goal: Option<String>,
    pub current: Option<FoodAnalysisResult>,
    pub error: Option<String>,
    pub credits: u32,
    pub is_paid: bool,
    pub history_len: usize,
}

/// One user session: entitlement, history and the mode state machine around the analysis pipeline.
pub struct NutriscanService<S: KeyValueStore, L: LLMClient> {
    store: Arc<S>,
    entitlement: EntitlementManager<S>,
    history: HistoryRingBuffer,
    session: SessionState,
    pipeline: FoodAnalysisPipeline<L>,
}

impl<S: KeyValueStore, L: LLMClient> NutriscanService<S, L> {
    pub fn new(store: Arc<S>, llm_client: Arc<L>) -> Self {
        let (entitlement, mode) = EntitlementManager::initialize(Arc::clone(&store));
        let history = HistoryRingBuffer::load(store.as_ref());

        info!(mode = %mode, history_len = history.len(), "session started");

        Self {
            store,
            entitlement,
            history,
            session: SessionState::new(mode),
            pipeline: FoodAnalysisPipeline::new(llm_client),
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.session.mode(),
            loading: self.session.is_loading(),
            goal: self.session.user_goal().map(|goal| goal.as_str().to_string()),
            current: self.session.current().cloned(),
            error: self.session.error().map(String::from),
            credits: self.entitlement.credits(),
            is_paid: self.entitlement.is_paid(),
            history_len: self.history.len(),
        }
    }

    pub fn mode(&self) -> Mode {
        self.session.mode()
    }

    fn guard(&self) -> Guard {
        Guard::from(&self.entitlement.state())
    }

    /// Rejects a grant the session could not act on, before any entitlement is written.
    fn ensure_grant_allowed(&self) -> Result<(), CoreError> {
        transition(
            self.session.mode(),
            self.session.phase(),
            &Action::EntitlementGranted,
            self.guard(),
        )?;
        Ok(())
    }

    pub fn grant_trial(&mut self, registration: &TrialRegistration) -> Result<(), CoreError> {
        self.ensure_grant_allowed()?;
        self.entitlement.grant_trial(registration)?;
        self.session.reduce(Action::EntitlementGranted, self.guard())?;
        Ok(())
    }

    pub fn grant_lifetime(&mut self, payment: &CardPayment) -> Result<(), CoreError> {
        self.ensure_grant_allowed()?;
        self.entitlement.grant_lifetime(payment)?;
        self.session.reduce(Action::EntitlementGranted, self.guard())?;
        Ok(())
    }

    pub fn select_goal(&mut self, raw: &str) -> Result<(), CoreError> {
        let goal = Goal::parse(raw)?;
        info!(goal = %goal.as_str(), "goal selected");
        self.session.reduce(Action::SelectGoal(goal), self.guard())?;
        Ok(())
    }

    fn goal_for_prompt(&self) -> String {
        self.session
            .user_goal()
            .map_or(FALLBACK_GOAL, |goal| goal.as_str())
            .to_string()
    }

    /// Commits the session to an initial analysis. Entitlement is checked here and charged
    /// only when the analysis is finished successfully.
    #[instrument(skip(self, image), fields(mime_type = %image.mime_type, image_bytes = image.data.len()))]
    pub fn begin_analysis(&mut self, image: ImageCapture) -> Result<PendingAnalysis, CoreError> {
        self.session.reduce(Action::CaptureImage, self.guard())?;

        Ok(PendingAnalysis {
            kind: AnalysisKind::Initial,
            image_uri: image.to_data_uri(),
            input: AnalyzeFoodInput {
                image,
                goal: self.goal_for_prompt(),
                correction: None,
            },
        })
    }

    /// Re-analyses the displayed photo as the food the user names. Not billed.
    #[instrument(skip(self))]
    pub fn begin_correction(&mut self, correction: &str) -> Result<PendingAnalysis, CoreError> {
        let correction = correction.trim();
        if correction.is_empty() {
            return Err(CoreError::Validation(
                "correction must not be empty".to_string(),
            ));
        }

        let Some(current) = self.session.current() else {
            return Err(SessionError::InvalidTransition {
                from: self.session.mode(),
                action: Action::StartCorrection.name(),
            }
            .into());
        };
        let image_uri = current.image_uri.clone();
        let image = ImageCapture::from_data_uri(&image_uri)?;

        self.session.reduce(Action::StartCorrection, self.guard())?;

        Ok(PendingAnalysis {
            kind: AnalysisKind::Correction,
            image_uri,
            input: AnalyzeFoodInput {
                image,
                goal: self.goal_for_prompt(),
                correction: Some(correction.to_string()),
            },
        })
    }

    /// The pipeline can be cloned out so the model call runs without borrowing the session.
    pub fn pipeline(&self) -> FoodAnalysisPipeline<L> {
        self.pipeline.clone()
    }

    /// Applies the outcome of a pending analysis: charge, display and history on success,
    /// rollback and a stored error message on failure.
    #[instrument(skip_all, fields(kind = ?pending.kind, success = outcome.is_ok()))]
    pub fn finish_analysis(
        &mut self,
        pending: PendingAnalysis,
        outcome: Result<AnalysisPayload, CoreError>,
    ) -> Result<FoodAnalysisResult, CoreError> {
        let payload = match outcome {
            Ok(payload) => payload,
            Err(e) => {
                let message = e.to_string();
                let action = match pending.kind {
                    AnalysisKind::Initial => Action::AnalysisFailed(message),
                    AnalysisKind::Correction => Action::CorrectionFailed(message),
                };
                self.session.reduce(action, self.guard())?;
                warn!(error = %e, "analysis failed, no credit consumed");
                return Err(e);
            }
        };

        let result = pending.to_result(payload);

        match pending.kind {
            AnalysisKind::Initial => {
                self.session
                    .reduce(Action::AnalysisSucceeded(result.clone()), self.guard())?;
                if !self.entitlement.consume() {
                    warn!("analysis finished without a credit to consume");
                }
                self.history.push(result.clone());
                self.history.persist(self.store.as_ref());
                info!(
                    credits = self.entitlement.credits(),
                    history_len = self.history.len(),
                    "analysis completed"
                );
            }
            AnalysisKind::Correction => {
                self.session
                    .reduce(Action::CorrectionSucceeded(result.clone()), self.guard())?;
                info!("correction completed");
            }
        }

        Ok(result)
    }

    pub async fn analyze_image(
        &mut self,
        image: ImageCapture,
    ) -> Result<FoodAnalysisResult, CoreError> {
        let pending = self.begin_analysis(image)?;
        let outcome = self.pipeline.run(pending.input.clone()).await;
        self.finish_analysis(pending, outcome)
    }

    pub async fn correct_analysis(
        &mut self,
        correction: &str,
    ) -> Result<FoodAnalysisResult, CoreError> {
        let pending = self.begin_correction(correction)?;
        let outcome = self.pipeline.run(pending.input.clone()).await;
        self.finish_analysis(pending, outcome)
    }

    pub fn new_analysis(&mut self) -> Result<(), CoreError> {
        self.session.reduce(Action::NewAnalysis, self.guard())?;
        Ok(())
    }

    pub fn change_goal(&mut self) -> Result<(), CoreError> {
        self.session.reduce(Action::ChangeGoal, self.guard())?;
        Ok(())
    }

    pub fn history(&self) -> Vec<FoodAnalysisResult> {
        self.history.to_vec()
    }

    pub fn select_history(&mut self, index: usize) -> Result<FoodAnalysisResult, CoreError> {
        let item = self.history.get(index).cloned().ok_or(CoreError::NotFound)?;
        self.session
            .reduce(Action::SelectHistory(item.clone()), self.guard())?;
        Ok(item)
    }

    /// Result to hand to the host's print facility. Lifetime plan only.
    pub fn export_document(&mut self) -> Result<FoodAnalysisResult, CoreError> {
        self.session.reduce(Action::ExportDocument, self.guard())?;
        self.session.current().cloned().ok_or(CoreError::NotFound)
    }

    /// Illustration URL for the displayed recipe. A random seed is drawn when none is given.
    pub fn recipe_image_url(&self, seed: Option<u32>) -> Result<String, CoreError> {
        let recipe = self
            .session
            .current()
            .and_then(|result| result.suggested_recipe.as_ref())
            .ok_or(CoreError::NotFound)?;

        let seed = seed.unwrap_or_else(|| rand::thread_rng().gen_range(0..RECIPE_SEED_RANGE));
        Ok(recipe_image_url(recipe, seed))
    }
}
