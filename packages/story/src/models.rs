use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use uuid::Uuid;

use crate::word_target::{word_target_for, WordTarget};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Lang {
    Sv,
    En,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StoryLength {
    Short,
    Medium,
    Long,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Tone {
    Cozy,
    Silly,
    Adventurous,
    Calm,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReadingLevel {
    Simple,
    Normal,
}

/// Descriptive metadata stored alongside a generated story.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryMeta {
    pub language: Lang,
    pub length: StoryLength,
    pub word_target: WordTarget,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<Tone>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_level: Option<ReadingLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_down: Option<bool>,
}

impl StoryMeta {
    pub fn new(language: Lang, length: StoryLength) -> Self {
        Self {
            language,
            length,
            word_target: word_target_for(length),
            tone: None,
            reading_level: None,
            wind_down: None,
        }
    }

    pub fn with_tone(mut self, tone: Tone) -> Self {
        self.tone = Some(tone);
        self
    }

    pub fn with_reading_level(mut self, reading_level: ReadingLevel) -> Self {
        self.reading_level = Some(reading_level);
        self
    }

    pub fn with_wind_down(mut self, wind_down: bool) -> Self {
        self.wind_down = Some(wind_down);
        self
    }

    /// Whether the stored word target still matches the length.
    pub fn is_consistent(&self) -> bool {
        self.word_target == word_target_for(self.length)
    }
}

/// A generated story. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoryRecord {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub text: String,
    pub meta: StoryMeta,
}

impl StoryRecord {
    /// New record with a fresh id. `created_at` is truncated to microseconds,
    /// the precision of a Postgres `timestamptz`.
    pub fn new(text: impl Into<String>, meta: StoryMeta) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now().trunc_subsecs(6),
            text: text.into(),
            meta,
        }
    }
}
