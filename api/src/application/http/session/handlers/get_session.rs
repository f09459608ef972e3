use axum::extract::State;
use nutriscan_core::application::SessionSnapshot;
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::http::server::{
    api_entities::{api_error::ApiError, response::Response},
    app_state::AppState,
};

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct SessionResponse {
    pub data: SessionSnapshot,
}

#[utoipa::path(
    get,
    path = "",
    tag = "session",
    summary = "Get session",
    description = "Current mode, entitlement, displayed result and loading state of the session.",
    responses(
        (status = 200, body = SessionResponse)
    ),
)]
pub async fn get_session(
    State(state): State<AppState>,
) -> Result<Response<SessionResponse>, ApiError> {
    let snapshot = state.service.lock().await.snapshot();

    Ok(Response::OK(SessionResponse { data: snapshot }))
}
