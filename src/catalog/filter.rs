//! Voice search and category filtering.

use super::types::Voice;
use crate::{Error, ErrorContext, Result};
use std::fmt;
use std::str::FromStr;

const GENDERS: [&str; 3] = ["male", "female", "neutral"];

/// Category tab. Anything that is not a gender tag, `all` or `other` filters by accent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Male,
    Female,
    Neutral,
    /// Gender missing or outside male/female/neutral.
    Other,
    /// Accent name, e.g. `british`; compared case-insensitively.
    Accent(String),
}

impl CategoryFilter {
    /// The tabs offered by the front end, in display order.
    pub fn tabs() -> Vec<CategoryFilter> {
        vec![
            Self::All,
            Self::Male,
            Self::Female,
            Self::Neutral,
            Self::Accent("british".to_string()),
            Self::Other,
        ]
    }

    pub fn matches(&self, voice: &Voice) -> bool {
        let gender = voice.gender().map(str::to_lowercase);
        match self {
            Self::All => true,
            Self::Male => gender.as_deref() == Some("male"),
            Self::Female => gender.as_deref() == Some("female"),
            Self::Neutral => gender.as_deref() == Some("neutral"),
            Self::Other => match gender {
                Some(g) => !GENDERS.contains(&g.as_str()),
                None => true,
            },
            Self::Accent(accent) => voice
                .accent()
                .map(|a| a.to_lowercase() == accent.to_lowercase())
                .unwrap_or(false),
        }
    }
}

impl FromStr for CategoryFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let tag = s.trim().to_lowercase();
        Ok(match tag.as_str() {
            "" => {
                return Err(Error::validation_with_context(
                    "Category must not be empty",
                    ErrorContext::new().with_field_path("category"),
                ))
            }
            "all" => Self::All,
            "male" => Self::Male,
            "female" => Self::Female,
            "neutral" => Self::Neutral,
            "other" => Self::Other,
            _ => Self::Accent(tag),
        })
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Male => f.write_str("male"),
            Self::Female => f.write_str("female"),
            Self::Neutral => f.write_str("neutral"),
            Self::Other => f.write_str("other"),
            Self::Accent(a) => f.write_str(a),
        }
    }
}

/// Search term plus category. An empty term matches every voice.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VoiceFilter {
    term: String,
    pub category: CategoryFilter,
}

impl VoiceFilter {
    pub fn new(term: impl AsRef<str>, category: CategoryFilter) -> Self {
        Self {
            term: term.as_ref().to_lowercase(),
            category,
        }
    }

    pub fn term(&self) -> &str {
        &self.term
    }

    fn matches_term(&self, voice: &Voice) -> bool {
        if self.term.is_empty() {
            return true;
        }
        voice.name.to_lowercase().contains(&self.term)
            || voice
                .labels
                .values()
                .any(|v| v.to_lowercase().contains(&self.term))
    }

    pub fn matches(&self, voice: &Voice) -> bool {
        self.matches_term(voice) && self.category.matches(voice)
    }

    /// Matching voices in their original order.
    pub fn apply<'a>(&self, voices: &'a [Voice]) -> Vec<&'a Voice> {
        voices.iter().filter(|v| self.matches(v)).collect()
    }
}

/// Owned convenience form of [`VoiceFilter::apply`].
pub fn filter_voices(voices: &[Voice], term: &str, category: &CategoryFilter) -> Vec<Voice> {
    VoiceFilter::new(term, category.clone())
        .apply(voices)
        .into_iter()
        .cloned()
        .collect()
}

/// Distinct lower-cased accents, in first-seen order.
pub fn unique_accents(voices: &[Voice]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for accent in voices.iter().filter_map(|v| v.accent()) {
        let accent = accent.to_lowercase();
        if !seen.contains(&accent) {
            seen.push(accent);
        }
    }
    seen
}
