use serde_json::json;

/// Persona sent as system instruction with every analysis.
pub const SYSTEM_INSTRUCTION: &str = "Você é a NutriAI, o núcleo de inteligência nutricional do sistema ORIX.
Sua função é analisar imagens de alimentos e fornecer dados precisos (Calorias, Peso, Macros, Vitaminas e Minerais).
Sempre considere o OBJETIVO do usuário (Emagrecer, Ganhar Massa, etc) ao fazer seus comentários sobre o prato.
Ao sugerir a receita, forneça dicas úteis e palavras-chave visuais detalhadas para geração de imagem.
Seja futurista, direto e preciso.";

fn string_list(description: &str) -> serde_json::Value {
    json!({
        "type": "array",
        "items": { "type": "string" },
        "description": description
    })
}

/// Returns the JSON schema for food analysis LLM responses
pub fn get_food_analysis_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "description": {
                "type": "string",
                "description": "Análise técnica do prato considerando o objetivo do usuário. Seja direto."
            },
            "nutritionalInfo": {
                "type": "object",
                "properties": {
                    "calories": { "type": "string", "description": "Estimativa de calorias (ex: '450 kcal')" },
                    "protein": { "type": "string" },
                    "carbs": { "type": "string" },
                    "fat": { "type": "string" },
                    "weight": { "type": "string", "description": "Estimativa do peso total do prato (ex: '350g')" },
                    "vitamins": string_list("Lista de vitaminas principais presentes (ex: ['Vit A', 'Vit C'])"),
                    "minerals": string_list("Lista de minerais principais presentes (ex: ['Ferro', 'Cálcio'])")
                },
                "required": ["calories", "protein", "carbs", "fat"]
            },
            "suggestedRecipe": {
                "type": "object",
                "description": "Uma sugestão de receita completa baseada no prato ou uma alternativa saudável para o objetivo.",
                "properties": {
                    "title": { "type": "string" },
                    "description": { "type": "string", "description": "Breve introdução apetitosa sobre o prato sugerido." },
                    "ingredients": { "type": "array", "items": { "type": "string" } },
                    "instructions": { "type": "array", "items": { "type": "string" } },
                    "tips": string_list("3 dicas essenciais de preparo ou saúde para este prato."),
                    "imageKeywords": string_list("Palavras-chave VISUAIS EM INGLÊS para gerar uma imagem fotorealista (ex: 'grilled salmon, cinematic lighting, 4k').")
                },
                "required": ["title", "description", "ingredients", "instructions", "tips"]
            }
        },
        "required": ["description", "nutritionalInfo"]
    })
}
