mod anthropic;

pub use anthropic::AnthropicGenerator;

pub type ModelId = String;

/// Text-generation provider interface
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for a prompt with the given system instructions
    async fn generate(
        &self,
        system: &str,
        prompt: &str,
        model: &str,
    ) -> Result<Generation, GenerateError>;

    /// Like [`TextGenerator::generate`], passing text to `on_text` as it
    /// arrives. Providers without streaming hand over the whole text once.
    async fn generate_streaming(
        &self,
        system: &str,
        prompt: &str,
        model: &str,
        on_text: &mut (dyn for<'a> FnMut(&'a str) + Send),
    ) -> Result<Generation, GenerateError> {
        let generation = self.generate(system, prompt, model).await?;
        on_text(&generation.text);
        Ok(generation)
    }
}

#[derive(Debug, Clone)]
pub struct Generation {
    pub text: String,
    pub model: ModelId,
    pub provider: String,
    pub stop_reason: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    #[error("Authentication error: set ANTHROPIC_API_KEY")]
    AuthenticationError,

    #[error("Model returned no text")]
    EmptyResponse,
}
