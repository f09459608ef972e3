use std::future::Future;

use crate::domain::common::entities::app_errors::CoreError;

/// Everything the vision model needs for one analysis call.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionRequest {
    pub system_instruction: String,
    pub prompt: String,
    pub image_data: Vec<u8>,
    pub mime_type: String,
    pub response_schema: serde_json::Value,
}

/// LLM Client trait for calling AI models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    /// Returns the raw text of the first candidate.
    fn generate_with_image(
        &self,
        request: VisionRequest,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}
