use axum::extract::State;

use crate::application::http::{
    analysis::{
        handlers::analyze_image::{AnalysisResponse, complete_analysis},
        validators::CorrectAnalysisValidator,
    },
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/correction",
    tag = "analysis",
    summary = "Correct the identified food",
    description = "Re-analyses the displayed photo as the food named by the user. Corrections are not billed and do not change the history.",
    responses(
        (status = 200, body = AnalysisResponse),
        (status = 400, description = "Blank correction"),
        (status = 409, description = "No result is displayed or an analysis is running"),
        (status = 502, description = "The model call failed, the previous result is kept")
    ),
    request_body = CorrectAnalysisValidator
)]
pub async fn correct_analysis(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<CorrectAnalysisValidator>,
) -> Result<Response<AnalysisResponse>, ApiError> {
    let (pending, pipeline) = {
        let mut service = state.service.lock().await;
        let pending = service
            .begin_correction(&payload.correction)
            .map_err(ApiError::from)?;
        (pending, service.pipeline())
    };

    let result = complete_analysis(&state, pending, pipeline).await?;

    Ok(Response::OK(AnalysisResponse { data: result }))
}
