use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoryError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("prompt rejected: {reason}")]
    PromptRejected { reason: String },

    #[error("generated story still unsafe after {attempts} attempts: {reason}")]
    UnsafeOutput { attempts: u32, reason: String },

    #[error("invalid blocklist: {0}")]
    Blocklist(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("LLM API request failed: {0}")]
    LlmApiRequest(#[from] reqwest::Error),

    #[error("LLM API error (status {status}): {message}")]
    LlmApiError { status: u16, message: String },

    #[error("failed to parse LLM response: {0}")]
    LlmResponseParse(String),

    #[error("LLM returned empty response")]
    LlmEmptyResponse,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

pub type Result<T> = std::result::Result<T, StoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_provider_display() {
        let err = StoryError::UnsupportedProvider("anthropic".into());
        assert_eq!(err.to_string(), "Unsupported provider: anthropic");
    }

    #[test]
    fn test_unsafe_output_display() {
        let err = StoryError::UnsafeOutput {
            attempts: 2,
            reason: "contains disallowed content (violence)".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("2 attempts"));
        assert!(msg.contains("violence"));
    }
}
