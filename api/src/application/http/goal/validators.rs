use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct SelectGoalValidator {
    /// One of "Emagrecer", "Ganhar Massa", "Definir" or any custom text.
    #[schema(example = "Emagrecer")]
    #[validate(length(min = 1, max = 120, message = "goal must be between 1 and 120 characters"))]
    pub goal: String,
}
