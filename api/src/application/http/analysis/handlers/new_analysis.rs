use axum::extract::State;

use crate::application::http::{
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
    session::handlers::get_session::SessionResponse,
};

#[utoipa::path(
    post,
    path = "/new",
    tag = "analysis",
    summary = "Start a new analysis",
    description = "Leaves the result screen for the capture screen. Without credits the session moves to payment.",
    responses(
        (status = 200, body = SessionResponse),
        (status = 402, description = "No credits left"),
        (status = 409, description = "Not on the result screen")
    ),
)]
pub async fn new_analysis(
    State(state): State<AppState>,
) -> Result<Response<SessionResponse>, ApiError> {
    let mut service = state.service.lock().await;
    service.new_analysis().map_err(ApiError::from)?;

    Ok(Response::OK(SessionResponse {
        data: service.snapshot(),
    }))
}
