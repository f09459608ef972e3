use std::sync::Arc;

use tracing::{error, instrument};

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::AnalysisPayload,
        helpers::{build_prompt, strip_code_fence},
        ports::{LLMClient, VisionRequest},
        schema::{SYSTEM_INSTRUCTION, get_food_analysis_schema},
        value_objects::AnalyzeFoodInput,
    },
};

/// Drives the single external call of an analysis and validates what comes back.
///
/// The pipeline is stateless: entitlement checks, loading state and history are the
/// caller's concern, so it can run without holding any session lock.
#[derive(Debug)]
pub struct FoodAnalysisPipeline<L: LLMClient> {
    llm_client: Arc<L>,
}

impl<L: LLMClient> Clone for FoodAnalysisPipeline<L> {
    fn clone(&self) -> Self {
        Self {
            llm_client: Arc::clone(&self.llm_client),
        }
    }
}

impl<L: LLMClient> FoodAnalysisPipeline<L> {
    pub fn new(llm_client: Arc<L>) -> Self {
        Self { llm_client }
    }

    #[instrument(
        skip(self, input),
        fields(
            goal = %input.goal,
            correction = input.correction.is_some(),
            mime_type = %input.image.mime_type,
            image_bytes = input.image.data.len()
        )
    )]
    pub async fn run(&self, input: AnalyzeFoodInput) -> Result<AnalysisPayload, CoreError> {
        let prompt = build_prompt(&input.goal, input.correction.as_deref());

        let request = VisionRequest {
            system_instruction: SYSTEM_INSTRUCTION.to_string(),
            prompt,
            image_data: input.image.data,
            mime_type: input.image.mime_type,
            response_schema: get_food_analysis_schema(),
        };

        let raw_response = self
            .llm_client
            .generate_with_image(request)
            .await
            .map_err(|e| match e {
                CoreError::AnalysisFailed(_) => e,
                other => CoreError::AnalysisFailed(other.to_string()),
            })?;

        parse_analysis_response(&raw_response)
    }
}

/// Validates the model output: non-empty, optionally fenced, and conforming to the schema.
pub fn parse_analysis_response(raw_response: &str) -> Result<AnalysisPayload, CoreError> {
    if raw_response.trim().is_empty() {
        error!("LLM returned an empty analysis");
        return Err(CoreError::AnalysisFailed(
            "the model returned no analysis data".to_string(),
        ));
    }

    let cleaned = strip_code_fence(raw_response);

    serde_json::from_str::<AnalysisPayload>(cleaned).map_err(|e| {
        error!(response = %cleaned, "Failed to parse LLM response: {}", e);
        CoreError::AnalysisFailed(format!("Failed to parse LLM response: {}", e))
    })
}

#[cfg(test)]
pub mod fakes {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Scripted vision model: answers calls in order and records every request.
    #[derive(Debug, Default)]
    pub struct FakeLLMClient {
        responses: Mutex<VecDeque<Result<String, CoreError>>>,
        requests: Mutex<Vec<VisionRequest>>,
    }

    impl FakeLLMClient {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_response(&self, response: Result<String, CoreError>) {
            self.responses.lock().unwrap().push_back(response);
        }

        pub fn requests(&self) -> Vec<VisionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    impl LLMClient for FakeLLMClient {
        async fn generate_with_image(&self, request: VisionRequest) -> Result<String, CoreError> {
            self.requests.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(CoreError::AnalysisFailed("no scripted response".into())))
        }
    }

    pub const VALID_RESPONSE: &str = r#"{
        "description": "Prato equilibrado, adequado para emagrecer.",
        "nutritionalInfo": {
            "calories": "450 kcal",
            "protein": "35g",
            "carbs": "40g",
            "fat": "12g",
            "weight": "350g",
            "vitamins": ["Vit A", "Vit C"],
            "minerals": ["Ferro"]
        },
        "suggestedRecipe": {
            "title": "Frango grelhado com legumes",
            "description": "Uma versão leve do prato.",
            "ingredients": ["200g de frango", "brócolis"],
            "instructions": ["Tempere", "Grelhe"],
            "tips": ["Use pouco óleo"],
            "imageKeywords": ["grilled chicken", "vegetables"]
        }
    }"#;
}
