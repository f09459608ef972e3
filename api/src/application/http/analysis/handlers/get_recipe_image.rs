use axum::extract::{Query, State};
use serde::Serialize;
use utoipa::ToSchema;

use crate::application::http::{
    analysis::validators::RecipeImageParams,
    server::{
        api_entities::{api_error::ApiError, response::Response},
        app_state::AppState,
    },
};

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct RecipeImage {
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema, PartialEq)]
pub struct RecipeImageResponse {
    pub data: RecipeImage,
}

#[utoipa::path(
    get,
    path = "/recipe-image",
    tag = "analysis",
    summary = "Recipe illustration",
    description = "Text-to-image URL for the suggested recipe of the displayed result.",
    responses(
        (status = 200, body = RecipeImageResponse),
        (status = 404, description = "No displayed result with a recipe")
    ),
    params(RecipeImageParams),
)]
pub async fn get_recipe_image(
    State(state): State<AppState>,
    Query(params): Query<RecipeImageParams>,
) -> Result<Response<RecipeImageResponse>, ApiError> {
    let url = state
        .service
        .lock()
        .await
        .recipe_image_url(params.seed)
        .map_err(ApiError::from)?;

    Ok(Response::OK(RecipeImageResponse {
        data: RecipeImage { url },
    }))
}
