use axum::{
    Router,
    routing::{get, post},
};
use utoipa::OpenApi;

use super::handlers::{
    get_history::{__path_get_history, get_history},
    select_history::{__path_select_history, select_history},
};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(get_history, select_history))]
pub struct HistoryApiDoc;

pub fn history_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            &format!("{}/history", state.args.server.root_path),
            get(get_history),
        )
        .route(
            &format!("{}/history/{{index}}/select", state.args.server.root_path),
            post(select_history),
        )
}
