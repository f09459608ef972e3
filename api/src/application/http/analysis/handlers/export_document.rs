use axum::extract::State;

use crate::application::http::{
    analysis::handlers::analyze_image::AnalysisResponse,
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

#[utoipa::path(
    get,
    path = "/export",
    tag = "analysis",
    summary = "Export the displayed result",
    description = "Returns the displayed result for printing. Lifetime plan only, other sessions are sent to payment.",
    responses(
        (status = 200, body = AnalysisResponse),
        (status = 402, description = "Lifetime plan required"),
        (status = 404, description = "No result is displayed")
    ),
)]
pub async fn export_document(
    State(state): State<AppState>,
) -> Result<Response<AnalysisResponse>, ApiError> {
    let result = state
        .service
        .lock()
        .await
        .export_document()
        .map_err(ApiError::from)?;

    Ok(Response::OK(AnalysisResponse { data: result }))
}
