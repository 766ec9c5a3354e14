use std::collections::HashMap;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use tracing::info;

use crate::error::{Result, StoryError};
use crate::models::Lang;

const DEFAULT_BLOCKLIST: &str = include_str!("../../blocklists/default.yaml");

/// One entry of a blocklist file.
#[derive(Debug, Clone, Deserialize)]
pub struct BlocklistRule {
    pub pattern: String,
    pub category: String,
    /// Overrides the reason reported when this rule matches.
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug)]
pub(crate) struct CompiledRule {
    pub(crate) regex: Regex,
    pub(crate) reason: String,
}

/// Compiled per-language pattern sets.
#[derive(Debug)]
pub struct Blocklist {
    rules: HashMap<Lang, Vec<CompiledRule>>,
}

impl Blocklist {
    /// The built-in pattern sets.
    pub fn default_set() -> Result<Self> {
        Self::from_yaml(DEFAULT_BLOCKLIST)
    }

    /// Parse and compile a YAML document mapping language codes to rule lists.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let raw: HashMap<Lang, Vec<BlocklistRule>> =
            serde_yaml_ng::from_str(yaml).map_err(|e| StoryError::Blocklist(e.to_string()))?;

        let mut rules = HashMap::new();
        for (lang, entries) in raw {
            let compiled = entries
                .into_iter()
                .map(compile_rule)
                .collect::<Result<Vec<_>>>()?;
            rules.insert(lang, compiled);
        }

        Ok(Self { rules })
    }

    /// Load a blocklist file, replacing the built-in sets entirely.
    pub fn from_path(path: &Path) -> Result<Self> {
        let yaml = std::fs::read_to_string(path)?;
        let blocklist = Self::from_yaml(&yaml)?;
        info!(path = %path.display(), rules = blocklist.len(), "loaded safety blocklist");
        Ok(blocklist)
    }

    /// Total number of rules across all languages.
    pub fn len(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn rules_for(&self, lang: Lang) -> &[CompiledRule] {
        self.rules.get(&lang).map(Vec::as_slice).unwrap_or(&[])
    }
}

fn compile_rule(rule: BlocklistRule) -> Result<CompiledRule> {
    if rule.pattern.trim().is_empty() {
        return Err(StoryError::Blocklist("empty pattern".into()));
    }

    let regex = RegexBuilder::new(&rule.pattern)
        .case_insensitive(true)
        .build()
        .map_err(|e| StoryError::Blocklist(format!("pattern '{}': {e}", rule.pattern)))?;

    let reason = rule
        .reason
        .filter(|r| !r.trim().is_empty())
        .unwrap_or_else(|| format!("contains disallowed content ({})", rule.category));

    Ok(CompiledRule { regex, reason })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_set_covers_both_languages() {
        let blocklist = Blocklist::default_set().unwrap();
        assert_eq!(blocklist.rules_for(Lang::Sv).len(), 10);
        assert_eq!(blocklist.rules_for(Lang::En).len(), 12);
        assert_eq!(blocklist.len(), 22);
    }

    #[test]
    fn test_rule_order_is_preserved() {
        let blocklist = Blocklist::default_set().unwrap();
        let first = &blocklist.rules_for(Lang::En)[0];
        assert_eq!(first.regex.as_str(), r"\bkill");
    }

    #[test]
    fn test_custom_reason() {
        let yaml = "en:\n  - { pattern: '\\bdragon', category: scary, reason: 'too scary' }\n";
        let blocklist = Blocklist::from_yaml(yaml).unwrap();
        assert_eq!(blocklist.rules_for(Lang::En)[0].reason, "too scary");
        assert!(blocklist.rules_for(Lang::Sv).is_empty());
    }

    #[test]
    fn test_invalid_regex_rejected() {
        let yaml = "en:\n  - { pattern: '(unclosed', category: broken }\n";
        let err = Blocklist::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, StoryError::Blocklist(_)));
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_unknown_language_rejected() {
        let yaml = "de:\n  - { pattern: '\\btöten', category: violence }\n";
        assert!(matches!(
            Blocklist::from_yaml(yaml),
            Err(StoryError::Blocklist(_))
        ));
    }

    #[test]
    fn test_empty_pattern_rejected() {
        let yaml = "en:\n  - { pattern: '  ', category: nothing }\n";
        assert!(Blocklist::from_yaml(yaml).is_err());
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sv:\n  - {{ pattern: '\\btroll', category: scary }}").unwrap();
        let blocklist = Blocklist::from_path(file.path()).unwrap();
        assert_eq!(blocklist.len(), 1);
    }

    #[test]
    fn test_from_missing_path() {
        let err = Blocklist::from_path(Path::new("/nonexistent/blocklist.yaml")).unwrap_err();
        assert!(matches!(err, StoryError::Io(_)));
    }
}
