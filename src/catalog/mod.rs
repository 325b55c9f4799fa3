//! Voice catalog: built-in or provider-fetched voices, plus search.

pub mod builtin;
mod filter;
mod types;

pub use builtin::{DEFAULT_MODEL, DEFAULT_VOICE};
pub use filter::{filter_voices, unique_accents, CategoryFilter, VoiceFilter};
pub use types::{Model, Voice};
pub(crate) use types::VoicesResponse;

use crate::client::SpeechProvider;
use crate::config::VoiceSource;
use tracing::{info, warn};

pub const LOAD_FAILED_MESSAGE: &str = "Failed to load voices. Please check your API key.";

/// Outcome of loading the catalog. Load failures are a state, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogState {
    /// Remote source with no credential: nothing was requested.
    Empty,
    Loaded(Vec<Voice>),
    Unavailable(String),
}

pub struct VoiceCatalog {
    state: CatalogState,
}

impl VoiceCatalog {
    pub fn builtin() -> Self {
        Self {
            state: CatalogState::Loaded(builtin::voices().to_vec()),
        }
    }

    pub async fn load(source: VoiceSource, provider: &dyn SpeechProvider, api_key: &str) -> Self {
        match source {
            VoiceSource::Static => Self::builtin(),
            VoiceSource::Remote => Self::fetch(provider, api_key).await,
        }
    }

    pub async fn fetch(provider: &dyn SpeechProvider, api_key: &str) -> Self {
        if api_key.trim().is_empty() {
            return Self {
                state: CatalogState::Empty,
            };
        }
        let state = match provider.list_voices(api_key).await {
            Ok(voices) => {
                info!(count = voices.len(), "loaded voice catalog");
                CatalogState::Loaded(voices)
            }
            Err(e) => {
                warn!(error = %e, "error fetching voices");
                CatalogState::Unavailable(LOAD_FAILED_MESSAGE.to_string())
            }
        };
        Self { state }
    }

    pub fn state(&self) -> &CatalogState {
        &self.state
    }

    pub fn voices(&self) -> &[Voice] {
        match &self.state {
            CatalogState::Loaded(v) => v,
            _ => &[],
        }
    }

    pub fn filter(&self, filter: &VoiceFilter) -> Vec<&Voice> {
        filter.apply(self.voices())
    }

    pub fn search(&self, term: &str, category: &CategoryFilter) -> Vec<&Voice> {
        self.filter(&VoiceFilter::new(term, category.clone()))
    }

    pub fn find(&self, voice_id: &str) -> Option<&Voice> {
        self.voices().iter().find(|v| v.voice_id == voice_id)
    }

    pub fn unique_accents(&self) -> Vec<String> {
        unique_accents(self.voices())
    }

    pub fn models(&self) -> &'static [Model] {
        builtin::models()
    }

    pub fn find_model(&self, model_id: &str) -> Option<&'static Model> {
        builtin::models().iter().find(|m| m.id == model_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_british_search() {
        let catalog = VoiceCatalog::builtin();
        let hits = catalog.search("british", &CategoryFilter::All);
        let names: Vec<_> = hits.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["Roger", "George", "Callum", "Charlotte", "Daniel"]);
        assert!(hits
            .iter()
            .all(|v| v.accent().unwrap().eq_ignore_ascii_case("british")));
    }

    #[test]
    fn test_find_default_voice_and_model() {
        let catalog = VoiceCatalog::builtin();
        assert_eq!(catalog.find(DEFAULT_VOICE).unwrap().name, "Lily");
        assert_eq!(
            catalog.find_model(DEFAULT_MODEL).unwrap().name,
            "Eleven Multilingual v2"
        );
        assert!(catalog.find("missing").is_none());
    }

    #[test]
    fn test_static_source_ignores_credential() {
        let client = crate::ElevenLabsClient::builder()
            .base_url("http://127.0.0.1:1")
            .build()
            .unwrap();
        let catalog = tokio_test::block_on(VoiceCatalog::load(VoiceSource::Static, &client, ""));
        assert_eq!(catalog.voices().len(), builtin::voices().len());
    }

    #[test]
    fn test_builtin_accents() {
        assert_eq!(VoiceCatalog::builtin().unique_accents(), vec!["american", "british"]);
    }
}
