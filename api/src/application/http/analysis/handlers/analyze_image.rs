use std::sync::Arc;

use axum::extract::{Multipart, State};
use nutriscan_core::{
    domain::food_analysis::{
        FoodAnalysisPipeline, FoodAnalysisResult, ImageCapture, PendingAnalysis,
    },
    infrastructure::llm::GeminiLLMClient,
};
use serde::Serialize;
use tracing::{error, info};
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

pub const MAX_IMAGE_SIZE: usize = 10 * 1024 * 1024; // 10MB
const DEFAULT_IMAGE_MIME_TYPE: &str = "image/jpeg";

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct AnalysisResponse {
    pub data: FoodAnalysisResult,
}

#[utoipa::path(
    post,
    path = "/image",
    tag = "analysis",
    summary = "Analyze a food photo",
    description = "Sends the photo in the multipart `image` field to the vision model. One credit is consumed only when the analysis succeeds.",
    responses(
        (status = 200, body = AnalysisResponse),
        (status = 400, description = "Missing, empty or oversized image"),
        (status = 402, description = "No credits left"),
        (status = 409, description = "Another analysis is running or the session cannot capture now"),
        (status = 502, description = "The model call failed or returned unusable data")
    ),
)]
pub async fn analyze_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Response<AnalysisResponse>, ApiError> {
    let mut image: Option<ImageCapture> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Failed to read multipart field: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }

        let mime_type = field
            .content_type()
            .unwrap_or(DEFAULT_IMAGE_MIME_TYPE)
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read image: {}", e)))?;

        if data.len() > MAX_IMAGE_SIZE {
            return Err(ApiError::BadRequest(format!(
                "Image too large. Max size is {} bytes",
                MAX_IMAGE_SIZE
            )));
        }

        image = Some(ImageCapture::new(data.to_vec(), mime_type).map_err(ApiError::from)?);
    }

    let image = image.ok_or_else(|| ApiError::BadRequest("Missing image field".to_string()))?;
    info!(bytes = image.data.len(), mime_type = %image.mime_type, "image received");

    let (pending, pipeline) = {
        let mut service = state.service.lock().await;
        let pending = service.begin_analysis(image).map_err(ApiError::from)?;
        (pending, service.pipeline())
    };

    let result = complete_analysis(&state, pending, pipeline).await?;

    Ok(Response::OK(AnalysisResponse { data: result }))
}

/// Runs the model call and applies its outcome on a detached task, so a dropped
/// request cannot leave the session stuck in loading.
pub async fn complete_analysis(
    state: &AppState,
    pending: PendingAnalysis,
    pipeline: FoodAnalysisPipeline<GeminiLLMClient>,
) -> Result<FoodAnalysisResult, ApiError> {
    let service = Arc::clone(&state.service);

    tokio::spawn(async move {
        let outcome = pipeline.run(pending.input.clone()).await;
        service.lock().await.finish_analysis(pending, outcome)
    })
    .await
    .map_err(|e| {
        error!("analysis task failed: {}", e);
        ApiError::InternalServerError("Analysis task failed".to_string())
    })?
    .map_err(ApiError::from)
}
