//! dishwish — turn LLM text completions into structured recipes.
//!
//! Two pure halves form the core: the prompt compiler ([`prompt`]) renders
//! a [`GenerationRequest`] into system and user instructions encoding an
//! exact output grammar, and the parser ([`parser`]) converts whatever text
//! the model sends back into a [`Recipe`], degrading gracefully instead of
//! failing. Everything else is plumbing around the external completion
//! call: providers, configuration, and a builder front end.

pub mod builder;
pub mod config;
pub mod error;
pub mod model;
pub mod parser;
pub mod prompt;
pub mod providers;

use std::time::Duration;

use log::debug;

pub use builder::{ProviderKind, RecipeGenerator, RecipeGeneratorBuilder};
pub use config::AiConfig;
pub use error::GenerateError;
pub use model::{
    GeneratedRecipe, GenerationRequest, Ingredient, Recipe, RecipeSource, DEFAULT_RECIPE_NAME,
};
pub use parser::parse_model_output;
pub use prompt::{compile as compile_prompt, CompiledPrompt, RECIPE_SYSTEM_PROMPT};
pub use providers::{CompletionProvider, FallbackProvider, ProviderFactory};

/// Generate a recipe using the configured provider chain.
///
/// Loads configuration from `config.toml` / `DISHWISH__` environment
/// variables, resolves the fallback chain, and imposes the configured
/// timeout on the provider call.
pub async fn generate_recipe(
    request: &GenerationRequest,
) -> Result<GeneratedRecipe, GenerateError> {
    let config = AiConfig::load()?;
    let provider =
        FallbackProvider::new(&config).map_err(|e| GenerateError::Provider(e.to_string()))?;
    let timeout = Duration::from_secs(config.timeout);
    generate_recipe_with_provider(request, &provider, Some(timeout)).await
}

/// Generate a recipe through an explicit provider.
///
/// Compiles the prompt, requests a completion (optionally bounded by
/// `timeout`), and parses the reply. The parse step cannot fail; a
/// malformed reply yields a sparse recipe whose raw text rides along in
/// the returned [`GeneratedRecipe`].
pub async fn generate_recipe_with_provider(
    request: &GenerationRequest,
    provider: &dyn CompletionProvider,
    timeout: Option<Duration>,
) -> Result<GeneratedRecipe, GenerateError> {
    let compiled = prompt::compile(request);
    debug!("user prompt:\n{}", compiled.user);

    let completion = provider.complete(&compiled.system, &compiled.user);
    let raw_output = match timeout {
        Some(deadline) => tokio::time::timeout(deadline, completion)
            .await
            .map_err(|_| GenerateError::Timeout(deadline.as_secs()))?,
        None => completion.await,
    }
    .map_err(|e| GenerateError::Provider(e.to_string()))?;

    let recipe = parser::parse_model_output(&raw_output, request);
    debug!("parsed recipe {:?} from {} bytes", recipe.name, raw_output.len());

    Ok(GeneratedRecipe { recipe, raw_output })
}
