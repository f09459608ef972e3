use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct CorrectAnalysisValidator {
    /// What the dish actually is, e.g. "tapioca com queijo".
    #[validate(length(
        min = 1,
        max = 500,
        message = "correction must be between 1 and 500 characters"
    ))]
    pub correction: String,
}

#[derive(Debug, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct RecipeImageParams {
    /// Fixes the generated picture. Random when omitted.
    #[schema(example = 42)]
    pub seed: Option<u32>,
}
