use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::collections::HashMap;

/// Main AI configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct AiConfig {
    /// Default provider to use when not specified
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Map of provider name to provider configuration
    pub providers: HashMap<String, ProviderConfig>,
    /// Fallback configuration for automatic provider switching
    #[serde(default)]
    pub fallback: FallbackConfig,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

/// Configuration for a specific AI provider
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    /// Whether this provider is enabled
    pub enabled: bool,
    /// Model identifier (e.g. "gpt-4o-mini", "claude-sonnet-4.5")
    pub model: String,
    /// Temperature for generation (0.0-1.0). Kept low by default so the
    /// model sticks to the section format the parser expects.
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API key for authentication (can also be set via environment variable)
    pub api_key: Option<String>,
    /// Base URL for API endpoint (for custom or proxy endpoints)
    pub base_url: Option<String>,
}

/// Configuration for provider fallback and retry behavior
#[derive(Debug, Deserialize, Clone)]
pub struct FallbackConfig {
    /// Whether fallback is enabled
    #[serde(default)]
    pub enabled: bool,
    /// Order of providers to try (first to last)
    #[serde(default)]
    pub order: Vec<String>,
    /// Number of retry attempts per provider before fallback
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    /// Initial delay between retries in milliseconds (uses exponential backoff)
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            order: Vec::new(),
            retry_attempts: default_retry_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
        }
    }
}

// Default value functions
fn default_provider() -> String {
    "openai".to_string()
}

fn default_temperature() -> f32 {
    0.4
}

fn default_max_tokens() -> u32 {
    1800
}

fn default_retry_attempts() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_timeout() -> u64 {
    30
}

impl AiConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with DISHWISH__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: DISHWISH__PROVIDERS__OPENAI__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            // Optional config file (can be missing)
            .add_source(File::with_name("config").required(false))
            // Use double underscore for nested: DISHWISH__PROVIDERS__OPENAI__API_KEY
            .add_source(
                Environment::with_prefix("DISHWISH")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn test_provider_config() -> ProviderConfig {
        ProviderConfig {
            enabled: true,
            model: "test-model".to_string(),
            temperature: 0.4,
            max_tokens: 1800,
            api_key: Some("test-key".to_string()),
            base_url: None,
        }
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_provider(), "openai");
        assert_eq!(default_temperature(), 0.4);
        assert_eq!(default_max_tokens(), 1800);
        assert_eq!(default_retry_attempts(), 3);
        assert_eq!(default_retry_delay_ms(), 1000);
        assert_eq!(default_timeout(), 30);
    }

    #[test]
    fn test_fallback_config_default() {
        let fallback = FallbackConfig::default();
        assert!(!fallback.enabled);
        assert!(fallback.order.is_empty());
        assert_eq!(fallback.retry_attempts, 3);
        assert_eq!(fallback.retry_delay_ms, 1000);
    }

    #[test]
    fn test_ai_config_structure() {
        let mut providers = HashMap::new();
        providers.insert("openai".to_string(), test_provider_config());

        let config = AiConfig {
            default_provider: "openai".to_string(),
            providers,
            fallback: FallbackConfig::default(),
            timeout: default_timeout(),
        };

        assert_eq!(config.default_provider, "openai");
        assert!(config.providers.contains_key("openai"));
    }

    #[test]
    fn test_load_layers_environment_over_defaults() {
        // Clear any environment variables that might interfere
        let keys_to_clear: Vec<String> = env::vars()
            .filter(|(k, _)| k.starts_with("DISHWISH__"))
            .map(|(k, _)| k)
            .collect();
        for key in keys_to_clear {
            env::remove_var(&key);
        }

        env::set_var("DISHWISH__DEFAULT_PROVIDER", "ollama");
        env::set_var("DISHWISH__TIMEOUT", "45");
        env::set_var("DISHWISH__PROVIDERS__OLLAMA__ENABLED", "true");
        env::set_var("DISHWISH__PROVIDERS__OLLAMA__MODEL", "llama3.1");

        let config = AiConfig::load().unwrap();

        assert_eq!(config.default_provider, "ollama");
        assert_eq!(config.timeout, 45);
        let ollama = &config.providers["ollama"];
        assert!(ollama.enabled);
        assert_eq!(ollama.model, "llama3.1");
        // Fields the environment left alone keep their defaults
        assert_eq!(ollama.temperature, 0.4);
        assert_eq!(ollama.max_tokens, 1800);
        assert!(ollama.api_key.is_none());
        assert!(!config.fallback.enabled);

        for key in [
            "DISHWISH__DEFAULT_PROVIDER",
            "DISHWISH__TIMEOUT",
            "DISHWISH__PROVIDERS__OLLAMA__ENABLED",
            "DISHWISH__PROVIDERS__OLLAMA__MODEL",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn test_provider_config_optional_fields() {
        let config = ProviderConfig {
            api_key: None,
            base_url: None,
            ..test_provider_config()
        };
        assert!(config.api_key.is_none());
        assert!(config.base_url.is_none());
    }
}
