//! DreamTales story core.
//!
//! Generates short children's stories through an LLM vendor and keeps them
//! behind a keyword-based safety filter.
//!
//! # Example
//!
//! ```
//! use dreamtales_story::safety::{SafetyResult, SafetyScanner};
//! use dreamtales_story::{word_target_for, Lang, StoryLength};
//!
//! let target = word_target_for(StoryLength::Short);
//! assert_eq!((target.min, target.max), (300, 400));
//!
//! let scanner = SafetyScanner::with_defaults().unwrap();
//! assert_eq!(scanner.pre_moderate("Once upon a time", Lang::En), SafetyResult::Pass);
//! assert!(scanner.pre_moderate("I will kill you", Lang::En).is_rejected());
//! ```
//!
//! # Architecture
//!
//! - [`word_target`]: story length to word-count range
//! - [`safety`]: per-language regex blocklists, pre-moderation and post-scan
//! - [`generation`]: vendor registry, LLM clients and the text generator
//! - [`prompt`]: system prompt assembly from story metadata
//! - [`service`]: the moderate, generate, re-scan flow producing records
//! - [`store`]: story record persistence (memory or PostgreSQL)

pub mod config;
pub mod db;
pub mod error;
pub mod generation;
pub mod models;
pub mod prompt;
pub mod safety;
pub mod service;
pub mod store;
pub mod word_target;

pub use config::{StoreConfig, StoryConfig};
pub use db::{create_pool, run_migrations};
pub use error::{Result, StoryError};
pub use models::{Lang, ReadingLevel, StoryLength, StoryMeta, StoryRecord, Tone};
pub use service::{StoryRequest, StoryService};
pub use store::{MemoryStoryStore, PgStoryStore, StoryStore};
pub use word_target::{count_words, word_target_for, WordTarget};
