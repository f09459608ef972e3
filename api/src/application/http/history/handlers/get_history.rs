use axum::extract::State;
use nutriscan_core::domain::food_analysis::FoodAnalysisResult;
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct GetHistoryResponse {
    pub data: Vec<FoodAnalysisResult>,
}

#[utoipa::path(
    get,
    path = "",
    tag = "history",
    summary = "Get analysis history",
    description = "The last five analyses, newest first.",
    responses(
        (status = 200, body = GetHistoryResponse)
    ),
)]
pub async fn get_history(
    State(state): State<AppState>,
) -> Result<Response<GetHistoryResponse>, ApiError> {
    let history = state.service.lock().await.history();

    Ok(Response::OK(GetHistoryResponse { data: history }))
}
