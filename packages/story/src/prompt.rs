use crate::models::{Lang, ReadingLevel, StoryMeta, Tone};

/// Build the system prompt for a story with the given metadata.
///
/// The word-count instruction is added later by the generator, so it is not
/// part of this prompt.
pub fn build_system_prompt(meta: &StoryMeta) -> String {
    let mut prompt = String::new();

    match meta.language {
        Lang::Sv => prompt.push_str(
            "Du är en varm och fantasifull sagoberättare för barn mellan 3 och 8 år. \
             Skriv en originell saga på svenska.",
        ),
        Lang::En => prompt.push_str(
            "You are a warm and imaginative storyteller for children aged 3 to 8. \
             Write an original story in English.",
        ),
    }

    if let Some(tone) = meta.tone {
        prompt.push('\n');
        prompt.push_str(tone_instruction(tone, meta.language));
    }

    if let Some(level) = meta.reading_level {
        prompt.push('\n');
        prompt.push_str(reading_level_instruction(level, meta.language));
    }

    if meta.wind_down == Some(true) {
        prompt.push('\n');
        prompt.push_str(match meta.language {
            Lang::Sv => {
                "Låt sagan sakta varva ner mot slutet och avslutas lugnt, \
                 så att den passar som godnattsaga."
            }
            Lang::En => {
                "Let the story slowly wind down towards the end and finish calmly, \
                 so it works as a bedtime story."
            }
        });
    }

    prompt.push('\n');
    prompt.push_str(match meta.language {
        Lang::Sv => "Svara endast med sagans text, utan rubrik eller kommentarer.",
        Lang::En => "Reply with the story text only, without a title or commentary.",
    });

    prompt
}

/// Build the user prompt from the child's or parent's story idea.
pub fn build_user_prompt(idea: &str) -> String {
    idea.trim().to_string()
}

fn tone_instruction(tone: Tone, lang: Lang) -> &'static str {
    match (lang, tone) {
        (Lang::Sv, Tone::Cozy) => "Tonen ska vara mysig och trygg.",
        (Lang::Sv, Tone::Silly) => "Tonen ska vara fånig och rolig, gärna med lite busiga ordlekar.",
        (Lang::Sv, Tone::Adventurous) => "Tonen ska vara äventyrlig och spännande, men aldrig skrämmande.",
        (Lang::Sv, Tone::Calm) => "Tonen ska vara lugn och stillsam.",
        (Lang::En, Tone::Cozy) => "The tone should be cozy and reassuring.",
        (Lang::En, Tone::Silly) => "The tone should be silly and playful, with a bit of gentle wordplay.",
        (Lang::En, Tone::Adventurous) => "The tone should be adventurous and exciting, but never frightening.",
        (Lang::En, Tone::Calm) => "The tone should be calm and quiet.",
    }
}

fn reading_level_instruction(level: ReadingLevel, lang: Lang) -> &'static str {
    match (lang, level) {
        (Lang::Sv, ReadingLevel::Simple) => "Använd korta meningar och enkla, vardagliga ord.",
        (Lang::Sv, ReadingLevel::Normal) => "Använd ett levande språk som passar för högläsning.",
        (Lang::En, ReadingLevel::Simple) => "Use short sentences and simple, everyday words.",
        (Lang::En, ReadingLevel::Normal) => "Use vivid language suited to reading aloud.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StoryLength;
    use crate::safety::SafetyScanner;
    use strum::IntoEnumIterator;

    #[test]
    fn test_language_specific_base() {
        let sv = build_system_prompt(&StoryMeta::new(Lang::Sv, StoryLength::Short));
        let en = build_system_prompt(&StoryMeta::new(Lang::En, StoryLength::Short));
        assert!(sv.contains("på svenska"));
        assert!(en.contains("in English"));
    }

    #[test]
    fn test_optional_instructions() {
        let meta = StoryMeta::new(Lang::En, StoryLength::Medium)
            .with_tone(Tone::Silly)
            .with_reading_level(ReadingLevel::Simple)
            .with_wind_down(true);
        let prompt = build_system_prompt(&meta);
        assert!(prompt.contains("silly and playful"));
        assert!(prompt.contains("short sentences"));
        assert!(prompt.contains("bedtime story"));
    }

    #[test]
    fn test_wind_down_false_adds_nothing() {
        let plain = build_system_prompt(&StoryMeta::new(Lang::Sv, StoryLength::Long));
        let explicit = build_system_prompt(
            &StoryMeta::new(Lang::Sv, StoryLength::Long).with_wind_down(false),
        );
        assert_eq!(plain, explicit);
    }

    #[test]
    fn test_prompts_pass_own_safety_scan() {
        let scanner = SafetyScanner::with_defaults().unwrap();
        for lang in Lang::iter() {
            for tone in Tone::iter() {
                for level in ReadingLevel::iter() {
                    let meta = StoryMeta::new(lang, StoryLength::Short)
                        .with_tone(tone)
                        .with_reading_level(level)
                        .with_wind_down(true);
                    let prompt = build_system_prompt(&meta);
                    assert!(scanner.post_scan(&prompt, lang).is_pass(), "{prompt}");
                }
            }
        }
    }

    #[test]
    fn test_user_prompt_trimmed() {
        assert_eq!(build_user_prompt("  a brave snail \n"), "a brave snail");
    }
}
