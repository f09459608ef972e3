use axum::{Router, routing::post};
use utoipa::OpenApi;

use super::handlers::select_goal::{__path_select_goal, select_goal};
use crate::application::http::server::app_state::AppState;

#[derive(OpenApi)]
#[openapi(paths(select_goal))]
pub struct GoalApiDoc;

pub fn goal_routes(state: AppState) -> Router<AppState> {
    Router::new().route(
        &format!("{}/goal", state.args.server.root_path),
        post(select_goal),
    )
}
