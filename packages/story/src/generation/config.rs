use crate::config::env_or_default;
use crate::error::{Result, StoryError};

const DEFAULT_PROVIDER: &str = "openai:gpt-4o-mini";

/// Configuration for the story generation vendor.
#[derive(Clone)]
pub struct GenerationConfig {
    /// `vendor:model`, e.g. `openai:gpt-4o-mini`.
    pub provider: String,
    pub api_key: String,
    /// Overrides the vendor's default API base URL.
    pub api_base_url: Option<String>,
    pub temperature: f64,
    pub max_tokens: u32,
    pub timeout_secs: u64,
}

// api_key stays out of Debug output.
impl std::fmt::Debug for GenerationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationConfig")
            .field("provider", &self.provider)
            .field("api_key", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl GenerationConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("AI_API_KEY")
            .map_err(|_| StoryError::Config("AI_API_KEY not set".into()))?;

        let provider = std::env::var("AI_PROVIDER").unwrap_or_else(|_| DEFAULT_PROVIDER.into());

        let api_base_url = std::env::var("AI_API_BASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty());

        let temperature = env_or_default("AI_TEMPERATURE", 0.8);

        let max_tokens = env_or_default("AI_MAX_TOKENS", 2048);

        let timeout_secs = env_or_default("AI_TIMEOUT_SECS", 60);

        Ok(Self {
            provider,
            api_key,
            api_base_url,
            temperature,
            max_tokens,
            timeout_secs,
        })
    }

    /// Create a config builder for testing.
    pub fn builder(api_key: impl Into<String>) -> GenerationConfigBuilder {
        GenerationConfigBuilder {
            api_key: api_key.into(),
            provider: DEFAULT_PROVIDER.into(),
            api_base_url: None,
            temperature: 0.8,
            max_tokens: 2048,
            timeout_secs: 60,
        }
    }
}

/// Builder for constructing `GenerationConfig` in tests.
pub struct GenerationConfigBuilder {
    api_key: String,
    provider: String,
    api_base_url: Option<String>,
    temperature: f64,
    max_tokens: u32,
    timeout_secs: u64,
}

impl GenerationConfigBuilder {
    pub fn provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = provider.into();
        self
    }

    pub fn api_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = Some(api_base_url.into());
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    pub fn timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn build(self) -> GenerationConfig {
        GenerationConfig {
            provider: self.provider,
            api_key: self.api_key,
            api_base_url: self.api_base_url,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            timeout_secs: self.timeout_secs,
        }
    }
}
