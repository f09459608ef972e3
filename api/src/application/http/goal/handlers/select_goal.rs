use axum::extract::State;

use crate::application::http::{
    goal::validators::SelectGoalValidator,
    server::{
        api_entities::{
            api_error::{ApiError, ValidateJson},
            response::Response,
        },
        app_state::AppState,
    },
    session::handlers::get_session::SessionResponse,
};

#[utoipa::path(
    post,
    path = "",
    tag = "goal",
    summary = "Select goal",
    description = "Sets the physical goal every analysis is evaluated against and moves to the capture screen.",
    responses(
        (status = 200, body = SessionResponse),
        (status = 400, description = "Blank goal"),
        (status = 409, description = "The session is not on the onboarding screen")
    ),
    request_body = SelectGoalValidator
)]
pub async fn select_goal(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<SelectGoalValidator>,
) -> Result<Response<SessionResponse>, ApiError> {
    let mut service = state.service.lock().await;
    service.select_goal(&payload.goal).map_err(ApiError::from)?;

    Ok(Response::OK(SessionResponse {
        data: service.snapshot(),
    }))
}
