//! Word-count targets per story length.

use serde::{Deserialize, Serialize};

use crate::models::StoryLength;

/// Inclusive word-count range a generated story should land in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordTarget {
    pub min: u32,
    pub max: u32,
}

impl WordTarget {
    pub fn contains(&self, words: usize) -> bool {
        let words = u32::try_from(words).unwrap_or(u32::MAX);
        (self.min..=self.max).contains(&words)
    }
}

/// Resolve the word-count range for a story length.
pub fn word_target_for(length: StoryLength) -> WordTarget {
    match length {
        StoryLength::Short => WordTarget { min: 300, max: 400 },
        StoryLength::Medium => WordTarget { min: 500, max: 700 },
        StoryLength::Long => WordTarget { min: 900, max: 1100 },
    }
}

/// Count whitespace-separated words.
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_short_target() {
        assert_eq!(
            word_target_for(StoryLength::Short),
            WordTarget { min: 300, max: 400 }
        );
    }

    #[test]
    fn test_all_lengths_have_ordered_ranges() {
        for length in StoryLength::iter() {
            let target = word_target_for(length);
            assert!(target.min < target.max, "{length}: {target:?}");
            assert_eq!(target, word_target_for(length));
        }
    }

    #[test]
    fn test_ranges_grow_with_length() {
        let short = word_target_for(StoryLength::Short);
        let medium = word_target_for(StoryLength::Medium);
        let long = word_target_for(StoryLength::Long);
        assert!(short.max < medium.min);
        assert!(medium.max < long.min);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let target = word_target_for(StoryLength::Medium);
        assert!(target.contains(500));
        assert!(target.contains(700));
        assert!(!target.contains(499));
        assert!(!target.contains(701));
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  Once upon\n a   time "), 4);
    }
}
