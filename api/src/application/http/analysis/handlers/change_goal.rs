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
    path = "/change-goal",
    tag = "analysis",
    summary = "Change goal",
    description = "Clears the goal and displayed result and returns to onboarding.",
    responses(
        (status = 200, body = SessionResponse),
        (status = 402, description = "No credits left"),
        (status = 409, description = "Not available from the current screen")
    ),
)]
pub async fn change_goal(
    State(state): State<AppState>,
) -> Result<Response<SessionResponse>, ApiError> {
    let mut service = state.service.lock().await;
    service.change_goal().map_err(ApiError::from)?;

    Ok(Response::OK(SessionResponse {
        data: service.snapshot(),
    }))
}
