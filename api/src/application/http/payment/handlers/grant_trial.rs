use axum::extract::State;
use nutriscan_core::domain::entitlement::TrialRegistration;

use crate::application::http::{
    payment::validators::GrantTrialValidator,
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
    path = "/trial",
    tag = "payment",
    summary = "Redeem the free trial",
    description = "Validates the registration form and coupon, then grants two analysis credits. Each email and phone can redeem the trial once.",
    responses(
        (status = 200, body = SessionResponse),
        (status = 400, description = "Invalid form, coupon or duplicate registration"),
        (status = 409, description = "The session is not on the payment screen")
    ),
    request_body = GrantTrialValidator
)]
pub async fn grant_trial(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<GrantTrialValidator>,
) -> Result<Response<SessionResponse>, ApiError> {
    let registration = TrialRegistration::from(payload);

    let mut service = state.service.lock().await;
    service.grant_trial(&registration).map_err(ApiError::from)?;

    Ok(Response::OK(SessionResponse {
        data: service.snapshot(),
    }))
}
