use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named synthesis persona.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    #[serde(alias = "id")]
    pub voice_id: String,
    pub name: String,
    /// Free-form descriptors such as `accent`, `gender`, `use_case`.
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_url: Option<String>,
}

impl Voice {
    pub fn label(&self, key: &str) -> Option<&str> {
        self.labels.get(key).map(String::as_str)
    }

    pub fn accent(&self) -> Option<&str> {
        self.label("accent")
    }

    pub fn gender(&self) -> Option<&str> {
        self.label("gender")
    }

    /// The use-case label, under any of the spellings the provider has used.
    pub fn use_case(&self) -> Option<&str> {
        self.label("use_case")
            .or_else(|| self.label("useCase"))
            .or_else(|| self.label("use case"))
    }
}

/// A synthesis engine variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
    pub description: String,
}

/// `GET /v1/voices` response body.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct VoicesResponse {
    #[serde(default)]
    pub voices: Vec<Voice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_voice_shape() {
        let raw = r#"{
            "voice_id": "abc",
            "name": "Roger",
            "category": "premade",
            "labels": {"accent": "british", "gender": "male", "use case": "narration"},
            "preview_url": "https://example.com/p.mp3",
            "settings": null
        }"#;
        let voice: Voice = serde_json::from_str(raw).unwrap();
        assert_eq!(voice.voice_id, "abc");
        assert_eq!(voice.accent(), Some("british"));
        assert_eq!(voice.use_case(), Some("narration"));
        assert_eq!(voice.category.as_deref(), Some("premade"));
    }

    #[test]
    fn test_voice_without_labels() {
        let voice: Voice = serde_json::from_str(r#"{"id": "x", "name": "X"}"#).unwrap();
        assert!(voice.labels.is_empty());
        assert_eq!(voice.gender(), None);
    }
}
