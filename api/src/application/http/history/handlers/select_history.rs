use axum::extract::{Path, State};

use crate::application::http::{
    analysis::handlers::analyze_image::AnalysisResponse,
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

#[utoipa::path(
    post,
    path = "/{index}/select",
    tag = "history",
    summary = "Show a history entry",
    description = "Displays a past analysis on the result screen. No credit is used.",
    responses(
        (status = 200, body = AnalysisResponse),
        (status = 404, description = "No entry at this position"),
        (status = 409, description = "Not available from the current screen")
    ),
    params(
        ("index" = usize, Path, description = "Position in the history, 0 is the newest"),
    ),
)]
pub async fn select_history(
    Path(index): Path<usize>,
    State(state): State<AppState>,
) -> Result<Response<AnalysisResponse>, ApiError> {
    let result = state
        .service
        .lock()
        .await
        .select_history(index)
        .map_err(ApiError::from)?;

    Ok(Response::OK(AnalysisResponse { data: result }))
}
