use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::error::{Result, StoryError};
use crate::generation::client::{LlmClient, OpenAiClient};
use crate::generation::config::GenerationConfig;

const OPENAI_BASE_URL: &str = "https://api.openai.com";

/// A configured `vendor:model` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    pub vendor: String,
    pub model: String,
}

impl ProviderSpec {
    /// Split on the first colon. The model keeps any further colons
    /// (`openai:ft:gpt-4o:acme` is vendor `openai`, model `ft:gpt-4o:acme`).
    /// A missing colon yields an empty model.
    pub fn parse(provider: &str) -> Self {
        let provider = provider.trim();
        let (vendor, model) = provider.split_once(':').unwrap_or((provider, ""));
        Self {
            vendor: vendor.trim().to_string(),
            model: model.trim().to_string(),
        }
    }
}

impl fmt::Display for ProviderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.vendor, self.model)
    }
}

/// Builds a client for one vendor.
pub trait VendorFactory: Send + Sync {
    fn create(&self, model: &str, config: &GenerationConfig) -> Result<Arc<dyn LlmClient>>;
}

impl<F> VendorFactory for F
where
    F: Fn(&str, &GenerationConfig) -> Result<Arc<dyn LlmClient>> + Send + Sync,
{
    fn create(&self, model: &str, config: &GenerationConfig) -> Result<Arc<dyn LlmClient>> {
        self(model, config)
    }
}

/// Factory for the OpenAI chat completions API.
pub struct OpenAiFactory;

impl VendorFactory for OpenAiFactory {
    fn create(&self, model: &str, config: &GenerationConfig) -> Result<Arc<dyn LlmClient>> {
        let base_url = config.api_base_url.as_deref().unwrap_or(OPENAI_BASE_URL);
        let client = OpenAiClient::new(
            config.api_key.clone(),
            base_url,
            model,
            Duration::from_secs(config.timeout_secs),
        )?;
        Ok(Arc::new(client))
    }
}

/// Maps vendor names to client factories.
#[derive(Default)]
pub struct VendorRegistry {
    factories: HashMap<String, Box<dyn VendorFactory>>,
}

impl VendorRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in vendor (currently only `openai`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register("openai", OpenAiFactory);
        registry
    }

    /// Add or replace a vendor.
    pub fn register(&mut self, vendor: impl Into<String>, factory: impl VendorFactory + 'static) {
        self.factories.insert(vendor.into(), Box::new(factory));
    }

    pub fn supports(&self, vendor: &str) -> bool {
        self.factories.contains_key(vendor)
    }

    pub fn vendors(&self) -> Vec<&str> {
        let mut vendors: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        vendors.sort_unstable();
        vendors
    }

    /// Create the client for `spec`. Unknown vendors fail before any network
    /// activity.
    pub fn resolve(&self, spec: &ProviderSpec, config: &GenerationConfig) -> Result<Arc<dyn LlmClient>> {
        let factory = self
            .factories
            .get(&spec.vendor)
            .ok_or_else(|| StoryError::UnsupportedProvider(spec.vendor.clone()))?;

        if spec.model.is_empty() {
            return Err(StoryError::Config(format!(
                "provider '{}' has no model, expected vendor:model",
                spec.vendor
            )));
        }

        info!(vendor = %spec.vendor, model = %spec.model, "resolved generation provider");
        factory.create(&spec.model, config)
    }
}
