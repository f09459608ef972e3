use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use utoipa::OpenApi;

use super::handlers::{
    analyze_image::{__path_analyze_image, MAX_IMAGE_SIZE, analyze_image},
    change_goal::{__path_change_goal, change_goal},
    correct_analysis::{__path_correct_analysis, correct_analysis},
    export_document::{__path_export_document, export_document},
    get_recipe_image::{__path_get_recipe_image, get_recipe_image},
    new_analysis::{__path_new_analysis, new_analysis},
};
use crate::application::http::server::app_state::AppState;

/// Room for the multipart framing around a maximum-size image.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

#[derive(OpenApi)]
#[openapi(paths(
    analyze_image,
    correct_analysis,
    new_analysis,
    change_goal,
    get_recipe_image,
    export_document
))]
pub struct AnalysisApiDoc;

pub fn analysis_routes(state: AppState) -> Router<AppState> {
    let root_path = &state.args.server.root_path;

    Router::new()
        .route(
            &format!("{}/analysis/image", root_path),
            post(analyze_image)
                .layer(DefaultBodyLimit::max(MAX_IMAGE_SIZE + MULTIPART_OVERHEAD)),
        )
        .route(
            &format!("{}/analysis/correction", root_path),
            post(correct_analysis),
        )
        .route(&format!("{}/analysis/new", root_path), post(new_analysis))
        .route(
            &format!("{}/analysis/change-goal", root_path),
            post(change_goal),
        )
        .route(
            &format!("{}/analysis/recipe-image", root_path),
            get(get_recipe_image),
        )
        .route(
            &format!("{}/analysis/export", root_path),
            get(export_document),
        )
}
