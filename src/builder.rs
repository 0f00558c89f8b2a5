use std::time::Duration;

use crate::config::{AiConfig, FallbackConfig, ProviderConfig};
use crate::error::GenerateError;
use crate::model::{GeneratedRecipe, GenerationRequest};
use crate::generate_recipe_with_provider;
use crate::providers::{FallbackProvider, ProviderFactory};

/// Completion backend selector for the builder API
#[derive(Debug, Clone)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Ollama,
}

impl ProviderKind {
    /// Convert to the provider name string used by the factory
    fn as_str(&self) -> &str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Ollama => "ollama",
        }
    }
}

/// Builder for configuring and executing a recipe generation call
#[derive(Debug, Default)]
pub struct RecipeGeneratorBuilder {
    ingredients: Vec<String>,
    dietary_restrictions: Vec<String>,
    cuisine: Option<String>,
    skill_level: Option<String>,
    meal_type: Option<String>,
    specific_requests: Option<String>,
    provider: Option<ProviderKind>,
    api_key: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl RecipeGeneratorBuilder {
    /// Add one available ingredient
    ///
    /// # Example
    /// ```
    /// use dishwish::RecipeGenerator;
    ///
    /// let builder = RecipeGenerator::builder()
    ///     .ingredient("chicken")
    ///     .ingredient("rice");
    /// ```
    pub fn ingredient(mut self, ingredient: impl Into<String>) -> Self {
        self.ingredients.push(ingredient.into());
        self
    }

    /// Add several available ingredients at once
    pub fn ingredients<I, S>(mut self, ingredients: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ingredients
            .extend(ingredients.into_iter().map(Into::into));
        self
    }

    /// Add a dietary restriction (e.g. "vegan", "gluten-free")
    pub fn dietary_restriction(mut self, restriction: impl Into<String>) -> Self {
        self.dietary_restrictions.push(restriction.into());
        self
    }

    /// Set the preferred cuisine
    pub fn cuisine(mut self, cuisine: impl Into<String>) -> Self {
        self.cuisine = Some(cuisine.into());
        self
    }

    /// Set the cook's skill level
    pub fn skill_level(mut self, skill_level: impl Into<String>) -> Self {
        self.skill_level = Some(skill_level.into());
        self
    }

    /// Set the meal type (e.g. "dinner")
    pub fn meal_type(mut self, meal_type: impl Into<String>) -> Self {
        self.meal_type = Some(meal_type.into());
        self
    }

    /// Free-text extra requests passed through to the model
    pub fn specific_requests(mut self, requests: impl Into<String>) -> Self {
        self.specific_requests = Some(requests.into());
        self
    }

    /// Select a completion backend instead of the configured default
    ///
    /// # Example
    /// ```
    /// use dishwish::{ProviderKind, RecipeGenerator};
    ///
    /// let builder = RecipeGenerator::builder()
    ///     .ingredient("eggs")
    ///     .provider(ProviderKind::Anthropic);
    /// ```
    pub fn provider(mut self, provider: ProviderKind) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Set the API key directly instead of relying on environment
    /// variables or config files
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the model name for the selected backend
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Impose a deadline on the provider call
    ///
    /// The core has no timeout of its own; this is the caller-side policy.
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Execute the generation call
    ///
    /// # Errors
    /// Returns `GenerateError` if configuration cannot be loaded, no
    /// provider is usable, or the provider call fails or times out. A
    /// malformed model reply is not an error: it degrades into a sparser
    /// recipe.
    pub async fn generate(self) -> Result<GeneratedRecipe, GenerateError> {
        let request = GenerationRequest::new(
            self.ingredients,
            self.dietary_restrictions,
            self.cuisine,
            self.skill_level,
            self.meal_type,
            self.specific_requests,
        );

        // Direct overrides bypass the config file entirely
        if self.api_key.is_some() || self.model.is_some() {
            let provider_name = self
                .provider
                .as_ref()
                .map(|p| p.as_str())
                .ok_or_else(|| {
                    GenerateError::Builder(
                        "api_key()/model() overrides require provider()".to_string(),
                    )
                })?;

            let provider_config = ProviderConfig {
                enabled: true,
                model: self.model.unwrap_or_else(|| {
                    default_model_for(provider_name).to_string()
                }),
                temperature: 0.4,
                max_tokens: 1800,
                api_key: self.api_key,
                base_url: None,
            };
            let provider = ProviderFactory::create(provider_name, &provider_config)
                .map_err(|e| GenerateError::Provider(e.to_string()))?;

            return generate_recipe_with_provider(&request, provider.as_ref(), self.timeout)
                .await;
        }

        let mut config = AiConfig::load()?;
        if let Some(provider) = &self.provider {
            config.default_provider = provider.as_str().to_string();
            // A hand-picked provider also skips the fallback chain
            config.fallback = FallbackConfig::default();
        }
        ensure_provider_entry(&mut config);

        let timeout =
            self.timeout
                .unwrap_or_else(|| Duration::from_secs(config.timeout));
        let provider = FallbackProvider::new(&config)
            .map_err(|e| GenerateError::Provider(e.to_string()))?;
        generate_recipe_with_provider(&request, &provider, Some(timeout)).await
    }
}

/// Sensible default model per backend when only an API key was supplied
fn default_model_for(provider_name: &str) -> &'static str {
    match provider_name {
        "anthropic" => "claude-sonnet-4.5",
        "ollama" => "llama3.1",
        _ => "gpt-4o-mini",
    }
}

/// Make sure the selected default provider has a config entry, so running
/// with nothing but an API key in the environment still works.
fn ensure_provider_entry(config: &mut AiConfig) {
    let name = config.default_provider.clone();
    config
        .providers
        .entry(name.clone())
        .or_insert_with(|| ProviderConfig {
            enabled: true,
            model: default_model_for(&name).to_string(),
            temperature: 0.4,
            max_tokens: 1800,
            api_key: None,
            base_url: None,
        });
}

/// Main entry point for the builder API
pub struct RecipeGenerator;

impl RecipeGenerator {
    /// Creates a new builder for generating recipes
    ///
    /// # Example
    /// ```
    /// use dishwish::RecipeGenerator;
    ///
    /// let builder = RecipeGenerator::builder();
    /// ```
    pub fn builder() -> RecipeGeneratorBuilder {
        RecipeGeneratorBuilder::default()
    }
}
