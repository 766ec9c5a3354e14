use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::generation::client::{LlmClient, LlmRequest, Message};
use crate::generation::config::GenerationConfig;
use crate::generation::provider::{ProviderSpec, VendorRegistry};
use crate::word_target::WordTarget;

/// Build the system/user exchange sent to the vendor.
pub fn build_messages(system: &str, user: &str, target: WordTarget) -> Vec<Message> {
    vec![
        Message::system(format!(
            "{system}\nWrite between {} and {} words.",
            target.min, target.max
        )),
        Message::user(user),
    ]
}

/// Single-shot story text generation against the configured vendor.
///
/// Returns the vendor's text verbatim. Safety retries belong to the caller.
pub struct TextGenerator {
    client: Arc<dyn LlmClient>,
    provider: String,
    max_tokens: u32,
    temperature: f64,
}

impl TextGenerator {
    /// Resolve the configured provider through `registry`.
    pub fn from_config(config: &GenerationConfig, registry: &VendorRegistry) -> Result<Self> {
        let spec = ProviderSpec::parse(&config.provider);
        let client = registry.resolve(&spec, config)?;
        Ok(Self {
            client,
            provider: spec.to_string(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        })
    }

    /// Wrap an already constructed client.
    pub fn with_client(client: Arc<dyn LlmClient>, config: &GenerationConfig) -> Self {
        Self {
            client,
            provider: config.provider.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub async fn generate_text(&self, system: &str, user: &str, target: WordTarget) -> Result<String> {
        let request = LlmRequest {
            messages: build_messages(system, user, target),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.client.complete(&request).await?;
        debug!(
            provider = %self.provider,
            input_tokens = response.input_tokens,
            output_tokens = response.output_tokens,
            "generation complete"
        );
        Ok(response.content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoryError;
    use crate::generation::client::test_support::MockLlmClient;
    use crate::generation::client::Role;
    use pretty_assertions::assert_eq;

    const TARGET: WordTarget = WordTarget { min: 300, max: 400 };

    #[test]
    fn test_build_messages() {
        let messages = build_messages("You tell stories.", "A fox who bakes bread", TARGET);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, Role::System);
        assert_eq!(
            messages[0].content,
            "You tell stories.\nWrite between 300 and 400 words."
        );
        assert_eq!(messages[1], Message::user("A fox who bakes bread"));
    }

    #[tokio::test]
    async fn test_generate_returns_text_verbatim() {
        let mock = Arc::new(MockLlmClient::with_response("  Once upon a time.\n"));
        let config = GenerationConfig::builder("k").max_tokens(900).temperature(0.5).build();
        let generator = TextGenerator::with_client(mock.clone(), &config);

        let text = generator.generate_text("sys", "user", TARGET).await.unwrap();
        assert_eq!(text, "  Once upon a time.\n");

        let requests = mock.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 900);
        assert_eq!(requests[0].temperature, 0.5);
    }

    #[tokio::test]
    async fn test_generate_propagates_client_error() {
        let mock = Arc::new(MockLlmClient::new(vec![Err(StoryError::LlmApiError {
            status: 503,
            message: "overloaded".into(),
        })]));
        let config = GenerationConfig::builder("k").build();
        let generator = TextGenerator::with_client(mock.clone(), &config);

        let result = generator.generate_text("sys", "user", TARGET).await;
        assert!(matches!(result, Err(StoryError::LlmApiError { status: 503, .. })));
        assert_eq!(mock.call_count(), 1);
    }

    #[test]
    fn test_from_config_unsupported_vendor() {
        let config = GenerationConfig::builder("k").provider("cohere:command").build();
        let result = TextGenerator::from_config(&config, &VendorRegistry::with_defaults());
        assert!(matches!(result, Err(StoryError::UnsupportedProvider(v)) if v == "cohere"));
    }

    #[test]
    fn test_from_config_openai() {
        let config = GenerationConfig::builder("k").provider("openai:gpt-x").build();
        let generator = TextGenerator::from_config(&config, &VendorRegistry::with_defaults()).unwrap();
        assert_eq!(generator.provider(), "openai:gpt-x");
    }
}
