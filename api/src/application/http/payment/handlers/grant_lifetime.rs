use axum::extract::State;
use nutriscan_core::domain::entitlement::CardPayment;

use crate::application::http::{
    payment::validators::GrantLifetimeValidator,
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
    path = "/card",
    tag = "payment",
    summary = "Buy lifetime access",
    description = "Checks the card locally (Luhn, holder, CVV) and unlocks unlimited analyses and document export. No charge is made.",
    responses(
        (status = 200, body = SessionResponse),
        (status = 400, description = "Invalid card"),
        (status = 409, description = "The session is not on the payment screen")
    ),
    request_body = GrantLifetimeValidator
)]
pub async fn grant_lifetime(
    State(state): State<AppState>,
    ValidateJson(payload): ValidateJson<GrantLifetimeValidator>,
) -> Result<Response<SessionResponse>, ApiError> {
    let payment = CardPayment::from(payload);

    let mut service = state.service.lock().await;
    service.grant_lifetime(&payment).map_err(ApiError::from)?;

    Ok(Response::OK(SessionResponse {
        data: service.snapshot(),
    }))
}
