use std::sync::LazyLock;

use regex::Regex;

use crate::domain::food_analysis::entities::Recipe;

static LEADING_FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?i:json)?\s*").expect("leading fence regex is valid"));

static TRAILING_FENCE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*```\s*$").expect("trailing fence regex is valid"));

const RECIPE_IMAGE_ENDPOINT: &str = "https://image.pollinations.ai/prompt";
const FALLBACK_IMAGE_KEYWORDS: &str = "gourmet food";

/// Removes an optional markdown code fence (with or without a `json` tag) around the model output.
pub fn strip_code_fence(raw: &str) -> &str {
    let text = raw.trim();
    let start = LEADING_FENCE_REGEX.find(text).map_or(0, |m| m.end());
    let text = &text[start..];
    let end = TRAILING_FENCE_REGEX
        .find(text)
        .map_or(text.len(), |m| m.start());
    text[..end].trim()
}

/// Builds the instruction sent along with the photo.
///
/// A correction replaces the visual identification: the model is told to trust the
/// user's description and recompute every field for it.
pub fn build_prompt(goal: &str, correction: Option<&str>) -> String {
    match correction {
        Some(correction) => format!(
            "ATENÇÃO: A identificação anterior pode estar incorreta. O usuário informou que este prato é: \"{correction}\".\n\
             O objetivo do usuário é: \"{goal}\".\n\
             Baseie sua análise nutricional e descrição EXCLUSIVAMENTE nesta informação fornecida pelo usuário (\"{correction}\") e na imagem visual. \
             Ignore a identificação visual anterior e recalcule tudo do zero para este alimento correto."
        ),
        None => format!(
            "O usuário tem o seguinte objetivo físico: \"{goal}\".\n\
             Analise este prato visualmente. Estime o peso total, calorias, macros e micronutrientes (vitaminas/minerais) principais.\n\
             Diga se este prato está alinhado com o objetivo de \"{goal}\"."
        ),
    }
}

/// Text-to-image URL illustrating a suggested recipe.
pub fn recipe_image_url(recipe: &Recipe, seed: u32) -> String {
    let keywords = recipe
        .image_keywords
        .as_ref()
        .filter(|keywords| !keywords.is_empty())
        .map(|keywords| keywords.join(", "))
        .unwrap_or_else(|| FALLBACK_IMAGE_KEYWORDS.to_string());

    let prompt = format!(
        "Professional food photography of {}, {}, cinematic lighting, 8k resolution, appetizing, highly detailed, photorealistic",
        recipe.title, keywords
    );

    format!(
        "{}/{}?width=1024&height=1024&nologo=true&seed={}",
        RECIPE_IMAGE_ENDPOINT,
        urlencoding::encode(&prompt),
        seed
    )
}
