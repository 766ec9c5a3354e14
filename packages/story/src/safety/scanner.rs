use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::error::Result;
use crate::models::Lang;
use crate::safety::blocklist::Blocklist;

/// Clause appended to a system prompt when regenerating after a failed post-scan.
pub const TIGHTEN_CLAUSE: &str =
    "Ensure the story is gentle and free of violence, gore, adult themes, or slurs.";

/// Outcome of a safety scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SafetyResult {
    Pass,
    Rejected { reason: String },
}

impl SafetyResult {
    pub fn is_pass(&self) -> bool {
        matches!(self, SafetyResult::Pass)
    }

    pub fn is_rejected(&self) -> bool {
        !self.is_pass()
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            SafetyResult::Pass => None,
            SafetyResult::Rejected { reason } => Some(reason),
        }
    }
}

/// Scans text against the configured blocklist.
#[derive(Debug)]
pub struct SafetyScanner {
    blocklist: Blocklist,
}

impl SafetyScanner {
    pub fn new(blocklist: Blocklist) -> Self {
        Self { blocklist }
    }

    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(Blocklist::default_set()?))
    }

    /// Use the blocklist at `path` if given, otherwise the built-in one.
    pub fn from_optional_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Ok(Self::new(Blocklist::from_path(path)?)),
            None => Self::with_defaults(),
        }
    }

    /// Check a user prompt before generation.
    pub fn pre_moderate(&self, prompt: &str, lang: Lang) -> SafetyResult {
        self.scan(prompt, lang)
    }

    /// Check generated text before it is shown or stored.
    pub fn post_scan(&self, text: &str, lang: Lang) -> SafetyResult {
        self.scan(text, lang)
    }

    fn scan(&self, text: &str, lang: Lang) -> SafetyResult {
        let lower = text.to_lowercase();
        for rule in self.blocklist.rules_for(lang) {
            if rule.regex.is_match(&lower) {
                debug!(lang = %lang, pattern = rule.regex.as_str(), "blocklist match");
                return SafetyResult::Rejected {
                    reason: rule.reason.clone(),
                };
            }
        }
        SafetyResult::Pass
    }
}

/// Append the safety clause to a system instruction.
///
/// Not idempotent: tightening an already tightened prompt appends the clause
/// again.
pub fn tighten_system_prompt(base: &str) -> String {
    format!("{base}\n{TIGHTEN_CLAUSE}")
}
