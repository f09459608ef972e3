use axum::{Router, routing::post};
use utoipa::OpenApi;

use super::handlers::{
    grant_lifetime::{__path_grant_lifetime, grant_lifetime},
    grant_trial::{__path_grant_trial, grant_trial},
};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(grant_trial, grant_lifetime))]
pub struct PaymentApiDoc;

pub fn payment_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/payment/trial", state.args.server.root_path),
            post(grant_trial),
        )
        .route(
            &format!("{}/payment/card", state.args.server.root_path),
            post(grant_lifetime),
        )
}
