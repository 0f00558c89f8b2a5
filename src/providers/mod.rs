mod anthropic;
mod factory;
mod fallback;
mod ollama;
mod open_ai;

pub use anthropic::AnthropicProvider;
pub use factory::ProviderFactory;
pub use fallback::FallbackProvider;
pub use ollama::OllamaProvider;
pub use open_ai::OpenAiProvider;

use async_trait::async_trait;
use std::error::Error;

/// Unified trait for all LLM completion backends.
///
/// A provider receives the compiled system and user instructions and
/// returns the model's raw text reply. It makes no promise about the shape
/// of that text; the parser copes with whatever comes back.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Get the provider name (e.g. "openai", "anthropic")
    fn provider_name(&self) -> &str;

    /// Request a completion for the given prompts
    async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> Result<String, Box<dyn Error + Send + Sync>>;
}
