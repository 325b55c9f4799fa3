//! Synthesis request types and their wire form.

use crate::catalog::{DEFAULT_MODEL, DEFAULT_VOICE};
use serde::Serialize;

pub const DEFAULT_STABILITY: f64 = 0.5;
pub const DEFAULT_SIMILARITY_BOOST: f64 = 0.75;
pub const DEFAULT_STYLE: f64 = 0.0;
pub const DEFAULT_SPEAKER_BOOST: bool = true;

/// One text-to-speech submission. Built fresh per submit, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRequest {
    pub text: String,
    pub voice_id: String,
    pub model_id: String,
    /// 0.0 to 1.0
    pub stability: f64,
    /// 0.0 to 1.0
    pub similarity_boost: f64,
    /// 0.0 to 1.0
    pub style: f64,
    /// Playback speed multiplier; omitted from the request when `None`.
    pub speed: Option<f64>,
    pub speaker_boost: bool,
}

impl SynthesisRequest {
    /// Request with default voice, model and settings.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            voice_id: DEFAULT_VOICE.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
            stability: DEFAULT_STABILITY,
            similarity_boost: DEFAULT_SIMILARITY_BOOST,
            style: DEFAULT_STYLE,
            speed: None,
            speaker_boost: DEFAULT_SPEAKER_BOOST,
        }
    }

    pub fn voice(mut self, voice_id: impl Into<String>) -> Self {
        self.voice_id = voice_id.into();
        self
    }

    pub fn model(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    pub fn stability(mut self, stability: f64) -> Self {
        self.stability = stability;
        self
    }

    pub fn similarity_boost(mut self, similarity_boost: f64) -> Self {
        self.similarity_boost = similarity_boost;
        self
    }

    pub fn style(mut self, style: f64) -> Self {
        self.style = style;
        self
    }

    pub fn speed(mut self, speed: f64) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn speaker_boost(mut self, enabled: bool) -> Self {
        self.speaker_boost = enabled;
        self
    }

    pub(crate) fn to_body(&self) -> SpeechBody<'_> {
        SpeechBody {
            text: &self.text,
            model_id: &self.model_id,
            voice_settings: VoiceSettings {
                stability: self.stability,
                similarity_boost: self.similarity_boost,
                style: self.style,
                use_speaker_boost: self.speaker_boost,
                speed: self.speed,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoiceSettings {
    pub stability: f64,
    pub similarity_boost: f64,
    pub style: f64,
    pub use_speaker_boost: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
}

/// JSON body of `POST /v1/text-to-speech/{voice_id}`.
#[derive(Debug, Serialize)]
pub(crate) struct SpeechBody<'a> {
    pub text: &'a str,
    pub model_id: &'a str,
    pub voice_settings: VoiceSettings,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_body_shape() {
        let request = SynthesisRequest::new("Hello world");
        let body = serde_json::to_value(request.to_body()).unwrap();
        assert_eq!(
            body,
            json!({
                "text": "Hello world",
                "model_id": "eleven_multilingual_v2",
                "voice_settings": {
                    "stability": 0.5,
                    "similarity_boost": 0.75,
                    "style": 0.0,
                    "use_speaker_boost": true
                }
            })
        );
    }

    #[test]
    fn test_speed_included_when_set() {
        let request = SynthesisRequest::new("hi").speed(1.1).speaker_boost(false);
        let body = serde_json::to_value(request.to_body()).unwrap();
        assert_eq!(body["voice_settings"]["speed"], json!(1.1));
        assert_eq!(body["voice_settings"]["use_speaker_boost"], json!(false));
    }
}
