mod client;
mod config;
mod generator;
mod provider;

pub use client::{LlmClient, LlmRequest, LlmResponse, Message, OpenAiClient, Role};
#[cfg(any(test, feature = "test-utils"))]
pub use client::test_support::MockLlmClient;
pub use config::{GenerationConfig, GenerationConfigBuilder};
pub use generator::{build_messages, TextGenerator};
pub use provider::{OpenAiFactory, ProviderSpec, VendorFactory, VendorRegistry};
