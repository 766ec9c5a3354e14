use std::sync::Arc;

use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::StoryConfig;
use crate::error::{Result, StoryError};
use crate::generation::TextGenerator;
use crate::models::{Lang, ReadingLevel, StoryLength, StoryMeta, StoryRecord, Tone};
use crate::prompt;
use crate::safety::{tighten_system_prompt, SafetyResult, SafetyScanner};
use crate::store::StoryStore;
use crate::word_target::count_words;

/// Upper bound on the length of a story idea, in characters.
pub const MAX_PROMPT_CHARS: usize = 1000;

/// A request to generate a story.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRequest {
    pub prompt: String,
    pub language: Lang,
    pub length: StoryLength,
    #[serde(default)]
    pub tone: Option<Tone>,
    #[serde(default)]
    pub reading_level: Option<ReadingLevel>,
    #[serde(default)]
    pub wind_down: Option<bool>,
}

impl StoryRequest {
    pub fn new(prompt: impl Into<String>, language: Lang, length: StoryLength) -> Self {
        Self {
            prompt: prompt.into(),
            language,
            length,
            tone: None,
            reading_level: None,
            wind_down: None,
        }
    }

    pub fn meta(&self) -> StoryMeta {
        StoryMeta {
            tone: self.tone,
            reading_level: self.reading_level,
            wind_down: self.wind_down,
            ..StoryMeta::new(self.language, self.length)
        }
    }
}

/// Runs the moderate, generate, post-scan flow and stores the result.
pub struct StoryService {
    generator: TextGenerator,
    scanner: Arc<SafetyScanner>,
    store: Arc<dyn StoryStore>,
    config: StoryConfig,
}

impl StoryService {
    pub fn new(
        generator: TextGenerator,
        scanner: Arc<SafetyScanner>,
        store: Arc<dyn StoryStore>,
        config: StoryConfig,
    ) -> Self {
        Self {
            generator,
            scanner,
            store,
            config,
        }
    }

    pub fn scanner(&self) -> &SafetyScanner {
        &self.scanner
    }

    /// Generate, check and persist a story.
    pub async fn create_story(&self, request: &StoryRequest) -> Result<StoryRecord> {
        let idea = prompt::build_user_prompt(&request.prompt);
        if idea.is_empty() {
            return Err(StoryError::InvalidInput("prompt is empty".into()));
        }
        if idea.chars().count() > MAX_PROMPT_CHARS {
            return Err(StoryError::InvalidInput(format!(
                "prompt exceeds {MAX_PROMPT_CHARS} characters"
            )));
        }

        let meta = request.meta();
        let lang = meta.language;

        if let SafetyResult::Rejected { reason } = self.scanner.pre_moderate(&idea, lang) {
            warn!(lang = %lang, reason = %reason, "prompt rejected by pre-moderation");
            return Err(StoryError::PromptRejected { reason });
        }

        let base_system = prompt::build_system_prompt(&meta);
        let tightened_system = tighten_system_prompt(&base_system);
        let max_attempts = self.config.max_safety_retries.saturating_add(1);

        let mut attempt = 0;
        let text = loop {
            attempt += 1;
            let system = if attempt == 1 {
                &base_system
            } else {
                &tightened_system
            };

            let text = self
                .generator
                .generate_text(system, &idea, meta.word_target)
                .await?;

            match self.scanner.post_scan(&text, lang) {
                SafetyResult::Pass => break text,
                SafetyResult::Rejected { reason } => {
                    warn!(attempt, max_attempts, reason = %reason, "generated story failed post-scan");
                    if attempt >= max_attempts {
                        return Err(StoryError::UnsafeOutput {
                            attempts: attempt,
                            reason,
                        });
                    }
                }
            }
        };

        let words = count_words(&text);
        if !meta.word_target.contains(words) {
            warn!(
                words,
                min = meta.word_target.min,
                max = meta.word_target.max,
                "generated story outside word target"
            );
        }

        let record = StoryRecord::new(text, meta);
        self.store.insert(&record).await?;

        info!(
            story_id = %record.id,
            lang = %lang,
            length = %record.meta.length,
            words,
            attempts = attempt,
            provider = self.generator.provider(),
            "story created"
        );
        Ok(record)
    }

    pub async fn get_story(&self, id: Uuid) -> Result<Option<StoryRecord>> {
        self.store.get(id).await
    }

    /// A page of stories, newest first, with the total count.
    pub async fn list_stories(&self, limit: i64, offset: i64) -> Result<(Vec<StoryRecord>, i64)> {
        let stories = self.store.list(limit, offset).await?;
        let total = self.store.count().await?;
        Ok((stories, total))
    }

    /// Pre-moderation check without generating anything.
    pub fn moderate(&self, text: &str, lang: Lang) -> SafetyResult {
        self.scanner.pre_moderate(text, lang)
    }
}
