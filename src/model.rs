use serde::{Deserialize, Serialize};

/// Validated user intent for one generation call.
///
/// Construct through [`GenerationRequest::new`] so every field arrives
/// trimmed and normalized: empty ingredient entries are dropped, dietary
/// restrictions are deduplicated, and blank optional fields become `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    pub ingredients: Vec<String>,
    pub dietary_restrictions: Vec<String>,
    pub cuisine: Option<String>,
    pub skill_level: Option<String>,
    pub meal_type: Option<String>,
    pub specific_requests: Option<String>,
}

impl GenerationRequest {
    pub fn new(
        ingredients: Vec<String>,
        dietary_restrictions: Vec<String>,
        cuisine: Option<String>,
        skill_level: Option<String>,
        meal_type: Option<String>,
        specific_requests: Option<String>,
    ) -> Self {
        let ingredients: Vec<String> = ingredients
            .into_iter()
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect();

        let mut restrictions: Vec<String> = Vec::new();
        for restriction in dietary_restrictions {
            let trimmed = restriction.trim().to_string();
            if !trimmed.is_empty() && !restrictions.contains(&trimmed) {
                restrictions.push(trimmed);
            }
        }

        GenerationRequest {
            ingredients,
            dietary_restrictions: restrictions,
            cuisine: normalize_optional(cuisine),
            skill_level: normalize_optional(skill_level),
            meal_type: normalize_optional(meal_type),
            specific_requests: normalize_optional(specific_requests),
        }
    }
}

fn normalize_optional(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// One parsed ingredient line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    /// Numeric, fraction, range, or a qualitative phrase like "to taste".
    /// Falls back to a sentinel when the line could not be decomposed.
    pub quantity: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub item: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Marker identifying how a recipe record was produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipeSource {
    #[default]
    Ai,
}

/// The persisted recipe artifact.
///
/// A Recipe is always constructible from any model output, however
/// malformed; degradation shows up as empty collections, sentinel values
/// and explanatory notes rather than an error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    /// Storage key, attached by the caller after persistence.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub servings: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cuisine: Option<String>,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub tags: Vec<String>,
    pub source: RecipeSource,
    /// The originating request, kept for traceability.
    pub ai_prompt: GenerationRequest,
}

/// Name used when the model output yields no usable recipe name.
pub const DEFAULT_RECIPE_NAME: &str = "Untitled AI Recipe";

/// What the pipeline hands back to the caller: the structured recipe plus
/// the model's literal reply, so a UI can always fall back to the raw text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedRecipe {
    pub recipe: Recipe,
    pub raw_output: String,
}

impl GeneratedRecipe {
    /// Heuristic for "structured extraction looks unreliable": the name is
    /// still at its default, or one of the lists came back empty.
    pub fn is_sparse(&self) -> bool {
        self.recipe.name == DEFAULT_RECIPE_NAME
            || self.recipe.ingredients.is_empty()
            || self.recipe.instructions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_normalizes_strings() {
        let request = GenerationRequest::new(
            vec![
                "  chicken ".to_string(),
                "".to_string(),
                "   ".to_string(),
                "rice".to_string(),
            ],
            vec![
                "vegan".to_string(),
                " vegan".to_string(),
                "gluten-free".to_string(),
            ],
            Some("  Italian ".to_string()),
            Some("   ".to_string()),
            None,
            Some(String::new()),
        );

        assert_eq!(request.ingredients, vec!["chicken", "rice"]);
        assert_eq!(request.dietary_restrictions, vec!["vegan", "gluten-free"]);
        assert_eq!(request.cuisine.as_deref(), Some("Italian"));
        assert!(request.skill_level.is_none());
        assert!(request.meal_type.is_none());
        assert!(request.specific_requests.is_none());
    }

    #[test]
    fn test_empty_request_is_valid() {
        let request = GenerationRequest::new(vec![], vec![], None, None, None, None);
        assert!(request.ingredients.is_empty());
        assert_eq!(request, GenerationRequest::default());
    }

    #[test]
    fn test_recipe_serializes_camel_case() {
        let recipe = Recipe {
            name: "Toast".to_string(),
            prep_time: Some("5 minutes".to_string()),
            ..Default::default()
        };
        let json = serde_json::to_value(&recipe).unwrap();
        assert_eq!(json["prepTime"], "5 minutes");
        assert_eq!(json["source"], "ai");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_sparse_heuristic() {
        let full = GeneratedRecipe {
            recipe: Recipe {
                name: "Tomato Soup".to_string(),
                ingredients: vec![Ingredient {
                    quantity: "2".to_string(),
                    unit: Some("cups".to_string()),
                    item: "tomato".to_string(),
                    notes: None,
                }],
                instructions: vec!["Simmer.".to_string()],
                ..Default::default()
            },
            raw_output: "raw".to_string(),
        };
        assert!(!full.is_sparse());

        let sparse = GeneratedRecipe {
            recipe: Recipe {
                name: DEFAULT_RECIPE_NAME.to_string(),
                ..full.recipe.clone()
            },
            raw_output: "raw".to_string(),
        };
        assert!(sparse.is_sparse());
    }
}
