//! Built-in voices and models, used when the catalog is not fetched remotely.

use super::types::{Model, Voice};
use once_cell::sync::Lazy;
use std::collections::BTreeMap;

pub const DEFAULT_MODEL: &str = "eleven_multilingual_v2";
/// Lily
pub const DEFAULT_VOICE: &str = "pFZP5JQG7iQjIQuC4Bku";

// (id, name, description, accent, gender, use case)
const FEATURED_VOICES: &[(&str, &str, &str, &str, &str, &str)] = &[
    ("9BWtsMINqrJLrRacOk9x", "Aria", "A versatile female voice with a pleasant tone", "American", "Female", "Versatile"),
    ("CwhRBWXzGAHq8TQ4Fs17", "Roger", "A deep, authoritative male voice", "British", "Male", "Narration"),
    ("EXAVITQu4vr4xnSDxMaL", "Sarah", "A friendly female voice with a natural cadence", "American", "Female", "Conversation"),
    ("FGY2WhTYpPnrIDTdsKH5", "Laura", "A soft-spoken female voice with a warm quality", "American", "Female", "Storytelling"),
    ("IKne3meq5aSn9XLyUdCD", "Charlie", "A youthful male voice with conversational quality", "American", "Male", "Conversation"),
    ("JBFqnCBsd6RMkjVDRZzb", "George", "A polished male voice with professional tone", "British", "Male", "Narration"),
    ("N2lVS1w4EtoT3dr4eOWO", "Callum", "A friendly male voice with a casual tone", "British", "Male", "Conversation"),
    ("SAz9YHcvj6GT2YYXdXww", "River", "A unique voice with androgynous quality", "American", "Neutral", "Creative"),
    ("TX3LPaxmHKxFdv7VOQHJ", "Liam", "A confident male voice with a clear delivery", "American", "Male", "Presentation"),
    ("XB0fDUnXU5powFXDhCwa", "Charlotte", "An elegant female voice with a refined quality", "British", "Female", "Narration"),
    ("Xb7hH8MSUJpSbSDYk0k2", "Alice", "A soothing female voice perfect for educational content", "American", "Female", "Education"),
    ("XrExE9yKIg1WjnnlVkGX", "Matilda", "A clear, expressive female voice", "American", "Female", "Audiobooks"),
    ("bIHbv24MWmeRgasZH58o", "Will", "A friendly male voice with a relatable quality", "American", "Male", "Narration"),
    ("cgSgspJ2msm6clMCkdW9", "Jessica", "An engaging female voice with a dynamic range", "American", "Female", "Presentation"),
    ("cjVigY5qzO86Huf0OWal", "Eric", "A clear male voice with a professional tone", "American", "Male", "Business"),
    ("iP95p4xoKVk53GoZ742B", "Chris", "A natural male voice with conversational flow", "American", "Male", "Podcasting"),
    ("nPczCjzI2devNBz1zQrb", "Brian", "A confident male voice with gravitas", "American", "Male", "Documentary"),
    ("onwK4e9ZLuTAKqWW03F9", "Daniel", "A deep male voice with a warm quality", "British", "Male", "Narration"),
    ("pFZP5JQG7iQjIQuC4Bku", "Lily", "A bright female voice with a youthful energy", "American", "Female", "Animation"),
    ("pqHfZKP75CvOlQylNhV4", "Bill", "A versatile male voice with an approachable tone", "American", "Male", "Versatile"),
];

// (id, name, description)
const MODELS: &[(&str, &str, &str)] = &[
    ("eleven_multilingual_v2", "Eleven Multilingual v2", "Our most life-like, emotionally rich model in 29 languages. Best for voice overs, audiobooks, and content creation."),
    ("eleven_turbo_v2_5", "Eleven Turbo v2.5", "High quality, low latency model in 32 languages. Best for developer use cases where speed matters."),
    ("eleven_turbo_v2", "Eleven Turbo v2", "English-only, low latency model. Best for developer use cases where speed matters and you only need English."),
    ("eleven_multilingual_v1", "Eleven Multilingual v1", "Our first multilingual model, capability of generating speech in 10 languages."),
    ("eleven_multilingual_sts_v2", "Eleven Multilingual v2 (STS)", "Multilingual speech-to-speech model for maximum control over content and prosody across various languages."),
    ("eleven_monolingual_v1", "Eleven English v1", "Our first ever text to speech model."),
    ("eleven_english_sts_v2", "Eleven English v2 (STS)", "Speech to speech model for maximum control over content and prosody."),
];

static VOICES: Lazy<Vec<Voice>> = Lazy::new(|| {
    FEATURED_VOICES
        .iter()
        .map(|(id, name, description, accent, gender, use_case)| {
            let mut labels = BTreeMap::new();
            labels.insert("accent".to_string(), accent.to_string());
            labels.insert("gender".to_string(), gender.to_string());
            labels.insert("use_case".to_string(), use_case.to_string());
            Voice {
                voice_id: id.to_string(),
                name: name.to_string(),
                labels,
                category: Some("Featured".to_string()),
                description: Some(description.to_string()),
                preview_url: None,
            }
        })
        .collect()
});

static ALL_MODELS: Lazy<Vec<Model>> = Lazy::new(|| {
    MODELS
        .iter()
        .map(|(id, name, description)| Model {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        })
        .collect()
});

pub fn voices() -> &'static [Voice] {
    &VOICES
}

pub fn models() -> &'static [Model] {
    &ALL_MODELS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_in_catalog() {
        assert!(voices().iter().any(|v| v.voice_id == DEFAULT_VOICE));
        assert!(models().iter().any(|m| m.id == DEFAULT_MODEL));
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ids: Vec<_> = voices().iter().map(|v| v.voice_id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), voices().len());
        assert_eq!(voices().len(), 20);
        assert_eq!(models().len(), 7);
    }
}
