use axum::{Router, routing::get};
use utoipa::OpenApi;

use super::handlers::get_session::{__path_get_session, get_session};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_session))]
pub struct SessionApiDoc;

pub fn session_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/session", state.args.server.root_path),
        get(get_session),
    )
}
