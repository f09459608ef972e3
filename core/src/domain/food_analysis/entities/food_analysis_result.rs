use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

use crate::domain::common::now_millis;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NutritionalInfo {
    #[serde(deserialize_with = "string_or_number")]
    pub calories: String,
    #[serde(deserialize_with = "string_or_number")]
    pub protein: String,
    #[serde(deserialize_with = "string_or_number")]
    pub carbs: String,
    #[serde(deserialize_with = "string_or_number")]
    pub fat: String,
    #[serde(
        default,
        deserialize_with = "optional_string_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub weight: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitamins: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minerals: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_keywords: Option<Vec<String>>,
}

/// Structured answer of the vision model, before it is bound to an image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPayload {
    pub description: String,
    pub nutritional_info: NutritionalInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_recipe: Option<Recipe>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FoodAnalysisResult {
    /// `data:<mime>;base64,<payload>` of the analysed photo.
    pub image_uri: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    #[schema(value_type = i64)]
    pub timestamp: DateTime<Utc>,
    pub description: String,
    pub nutritional_info: NutritionalInfo,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_recipe: Option<Recipe>,
}

impl FoodAnalysisResult {
    pub fn new(image_uri: String, payload: AnalysisPayload) -> Self {
        Self {
            image_uri,
            timestamp: now_millis(),
            description: payload.description,
            nutritional_info: payload.nutritional_info,
            suggested_recipe: payload.suggested_recipe,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }
    }
}

/// Accepts `"450 kcal"` as well as a bare `450` from the model.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    TextOrNumber::deserialize(deserializer).map(String::from)
}

fn optional_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<TextOrNumber>::deserialize(deserializer).map(|value| value.map(String::from))
}
