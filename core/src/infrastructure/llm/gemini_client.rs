use base64::{Engine as _, engine::general_purpose};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::domain::{
    common::{LLMConfig, entities::app_errors::CoreError},
    food_analysis::ports::{LLMClient, VisionRequest},
};

#[derive(Debug, Clone)]
pub struct GeminiLLMClient {
    base_url: String,
    api_key: String,
    model_name: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Debug, Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Debug, Deserialize)]
struct PartResponse {
    text: Option<String>,
}

impl GeminiResponse {
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .and_then(|c| c.parts.into_iter().find_map(|p| p.text))
    }
}

impl GeminiLLMClient {
    pub fn new(config: &LLMConfig) -> Result<Self, CoreError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| CoreError::AnalysisFailed(format!("failed to build HTTP client: {}", e)))?;

        info!(
            model = %config.gemini_model,
            timeout_secs = config.request_timeout.as_secs(),
            "Gemini client configured"
        );

        Ok(Self {
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
            api_key: config.gemini_api_key.clone(),
            model_name: config.gemini_model.clone(),
            client,
        })
    }

    fn build_request(request: VisionRequest) -> GeminiRequest {
        let base64_image = general_purpose::STANDARD.encode(&request.image_data);

        GeminiRequest {
            system_instruction: Some(Content {
                parts: vec![Part::Text {
                    text: request.system_instruction,
                }],
            }),
            contents: vec![Content {
                parts: vec![
                    Part::InlineData {
                        inline_data: InlineData {
                            mime_type: request.mime_type,
                            data: base64_image,
                        },
                    },
                    Part::Text {
                        text: request.prompt,
                    },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: request.response_schema,
            }),
        }
    }

    async fn call_gemini_api(&self, request: GeminiRequest) -> Result<String, CoreError> {
        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model_name, self.api_key
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                let e = e.without_url();
                error!("Gemini API request failed: {}", e);
                CoreError::AnalysisFailed(format!("LLM API error: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            error!("Gemini API error: {} - {}", status, error_text);
            return Err(CoreError::AnalysisFailed(format!(
                "LLM API returned error: {}",
                status
            )));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!("Failed to parse Gemini response: {}", e);
            CoreError::AnalysisFailed(format!("Failed to parse LLM response: {}", e))
        })?;

        gemini_response
            .first_text()
            .ok_or_else(|| CoreError::AnalysisFailed("No response from LLM".to_string()))
    }
}

impl LLMClient for GeminiLLMClient {
    async fn generate_with_image(&self, request: VisionRequest) -> Result<String, CoreError> {
        let request = Self::build_request(request);
        self.call_gemini_api(request).await
    }
}
