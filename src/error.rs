use thiserror::Error;

/// Errors that can occur while driving a generation call.
///
/// Note that parsing the model's reply contributes no variants here: the
/// parser is total and degrades into the returned data instead of failing.
#[derive(Error, Debug)]
pub enum GenerateError {
    /// Configuration could not be loaded or deserialized
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    /// The provider call failed, whether at the transport level or
    /// because the completion could not be used
    #[error("Provider error: {0}")]
    Provider(String),

    /// Builder was misconfigured
    #[error("Builder error: {0}")]
    Builder(String),

    /// The provider call exceeded the caller-imposed deadline
    #[error("Provider call timed out after {0}s")]
    Timeout(u64),
}
