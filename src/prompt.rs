//! Renders a [`GenerationRequest`] into the two texts sent to the model.
//!
//! The system prompt is the parser's contract with the model: its section
//! markers must match the marker table in [`crate::parser`]. Change them
//! together.

use crate::model::GenerationRequest;

/// The fixed system instruction describing the expected output grammar.
///
/// Loaded from `prompt.txt` at compile time so the wording can be edited
/// without dealing with Rust string syntax.
pub const RECIPE_SYSTEM_PROMPT: &str = include_str!("prompt.txt");

/// The two texts handed to the completion provider.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledPrompt {
    pub system: String,
    pub user: String,
}

/// Compile a request into prompt text. Pure and infallible: a request with
/// no ingredients and all optional fields absent still produces a valid
/// instruction asking the model to suggest freely.
pub fn compile(request: &GenerationRequest) -> CompiledPrompt {
    let mut user = String::from("Generate a recipe based on these details:\n");

    if request.ingredients.is_empty() {
        user.push_str("Ingredients Provided: None, suggest based on other preferences.\n");
    } else {
        user.push_str(&format!(
            "Ingredients Provided: {}\n",
            request.ingredients.join(", ")
        ));
    }
    if !request.dietary_restrictions.is_empty() {
        user.push_str(&format!(
            "Dietary Restrictions: {}\n",
            request.dietary_restrictions.join(", ")
        ));
    }
    if let Some(cuisine) = &request.cuisine {
        user.push_str(&format!("Preferred Cuisine: {}\n", cuisine));
    }
    if let Some(skill) = &request.skill_level {
        user.push_str(&format!("Cooking Skill Level: {}\n", skill));
    }
    if let Some(meal) = &request.meal_type {
        user.push_str(&format!("Meal Type: {}\n", meal));
    }
    if let Some(requests) = &request.specific_requests {
        user.push_str(&format!("Specific Requests: {}\n", requests));
    }

    CompiledPrompt {
        system: RECIPE_SYSTEM_PROMPT.to_string(),
        user,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_prompt_is_embedded() {
        assert!(!RECIPE_SYSTEM_PROMPT.is_empty());

        // The markers the parser recognizes must all be spelled out
        assert!(RECIPE_SYSTEM_PROMPT.contains("Recipe Name:"));
        assert!(RECIPE_SYSTEM_PROMPT.contains("Description:"));
        assert!(RECIPE_SYSTEM_PROMPT.contains("Prep Time:"));
        assert!(RECIPE_SYSTEM_PROMPT.contains("Cook Time:"));
        assert!(RECIPE_SYSTEM_PROMPT.contains("Servings:"));
        assert!(RECIPE_SYSTEM_PROMPT.contains("Cuisine:"));
        assert!(RECIPE_SYSTEM_PROMPT.contains("Ingredients:"));
        assert!(RECIPE_SYSTEM_PROMPT.contains("Instructions:"));
        assert!(RECIPE_SYSTEM_PROMPT.contains("Notes:"));
    }

    #[test]
    fn test_user_prompt_lists_supplied_fields() {
        let request = GenerationRequest::new(
            vec!["chicken".to_string(), "rice".to_string()],
            vec!["gluten-free".to_string()],
            Some("Thai".to_string()),
            Some("beginner".to_string()),
            Some("dinner".to_string()),
            Some("extra spicy".to_string()),
        );
        let prompt = compile(&request);

        assert!(prompt.user.contains("Ingredients Provided: chicken, rice"));
        assert!(prompt.user.contains("Dietary Restrictions: gluten-free"));
        assert!(prompt.user.contains("Preferred Cuisine: Thai"));
        assert!(prompt.user.contains("Cooking Skill Level: beginner"));
        assert!(prompt.user.contains("Meal Type: dinner"));
        assert!(prompt.user.contains("Specific Requests: extra spicy"));
    }

    #[test]
    fn test_absent_fields_are_omitted() {
        let request = GenerationRequest::default();
        let prompt = compile(&request);

        assert!(prompt
            .user
            .contains("Ingredients Provided: None, suggest based on other preferences."));
        assert!(!prompt.user.contains("Dietary Restrictions:"));
        assert!(!prompt.user.contains("Preferred Cuisine:"));
        assert!(!prompt.user.contains("Cooking Skill Level:"));
        assert!(!prompt.user.contains("Meal Type:"));
        assert!(!prompt.user.contains("Specific Requests:"));
    }

    #[test]
    fn test_compile_is_deterministic() {
        let request = GenerationRequest::new(
            vec!["eggs".to_string()],
            vec![],
            None,
            None,
            None,
            None,
        );
        assert_eq!(compile(&request), compile(&request));
    }
}
