//! Form component: field state for one synthesis submission.

use crate::audio::PlayableAudio;
use crate::catalog::{DEFAULT_MODEL, DEFAULT_VOICE};
use crate::client::{
    SynthesisRequest, DEFAULT_SIMILARITY_BOOST, DEFAULT_SPEAKER_BOOST, DEFAULT_STABILITY,
    DEFAULT_STYLE,
};
use crate::synthesis::{SynthesisSession, MAX_TEXT_LENGTH};
use crate::{Error, ErrorContext, Result};

pub const MIN_SPEED: f64 = 0.7;
pub const MAX_SPEED: f64 = 1.2;

#[derive(Debug, Clone, PartialEq)]
pub struct SpeechForm {
    text: String,
    voice_id: String,
    model_id: String,
    stability: f64,
    similarity_boost: f64,
    style: f64,
    speed: Option<f64>,
    speaker_boost: bool,
    show_advanced: bool,
    max_text_length: usize,
}

impl Default for SpeechForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            voice_id: DEFAULT_VOICE.to_string(),
            model_id: DEFAULT_MODEL.to_string(),
            stability: DEFAULT_STABILITY,
            similarity_boost: DEFAULT_SIMILARITY_BOOST,
            style: DEFAULT_STYLE,
            speed: None,
            speaker_boost: DEFAULT_SPEAKER_BOOST,
            show_advanced: false,
            max_text_length: MAX_TEXT_LENGTH,
        }
    }
}

fn unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

impl SpeechForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_text_length(mut self, max: usize) -> Self {
        self.max_text_length = max;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_voice(&mut self, voice_id: impl Into<String>) {
        self.voice_id = voice_id.into();
    }

    pub fn set_model(&mut self, model_id: impl Into<String>) {
        self.model_id = model_id.into();
    }

    pub fn set_stability(&mut self, value: f64) {
        self.stability = unit(value);
    }

    pub fn set_similarity_boost(&mut self, value: f64) {
        self.similarity_boost = unit(value);
    }

    pub fn set_style(&mut self, value: f64) {
        self.style = unit(value);
    }

    /// `None` leaves speed to the provider's default.
    pub fn set_speed(&mut self, value: Option<f64>) {
        self.speed = value
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(MIN_SPEED, MAX_SPEED));
    }

    pub fn set_speaker_boost(&mut self, enabled: bool) {
        self.speaker_boost = enabled;
    }

    pub fn set_show_advanced(&mut self, show: bool) {
        self.show_advanced = show;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn voice_id(&self) -> &str {
        &self.voice_id
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    pub fn stability(&self) -> f64 {
        self.stability
    }

    pub fn similarity_boost(&self) -> f64 {
        self.similarity_boost
    }

    pub fn speed(&self) -> Option<f64> {
        self.speed
    }

    pub fn show_advanced(&self) -> bool {
        self.show_advanced
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Negative once the text is over the limit.
    pub fn remaining_chars(&self) -> i64 {
        self.max_text_length as i64 - self.char_count() as i64
    }

    pub fn exceeded_by(&self) -> Option<usize> {
        self.char_count()
            .checked_sub(self.max_text_length)
            .filter(|n| *n > 0)
    }

    /// `"<n> / <max> characters"`
    pub fn counter_label(&self) -> String {
        format!("{} / {} characters", self.char_count(), self.max_text_length)
    }

    pub fn is_text_valid(&self) -> bool {
        !self.text.trim().is_empty() && self.remaining_chars() >= 0
    }

    pub fn can_submit(&self, has_credential: bool, is_loading: bool) -> bool {
        self.is_text_valid() && has_credential && !is_loading
    }

    pub fn to_request(&self) -> SynthesisRequest {
        SynthesisRequest {
            text: self.text.clone(),
            voice_id: self.voice_id.clone(),
            model_id: self.model_id.clone(),
            stability: self.stability,
            similarity_boost: self.similarity_boost,
            style: self.style,
            speed: self.speed,
            speaker_boost: self.speaker_boost,
        }
    }

    fn check(&self, api_key: &str, is_loading: bool) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(Error::validation_with_context(
                "Text must not be empty",
                ErrorContext::new().with_field_path("text"),
            ));
        }
        if let Some(over) = self.exceeded_by() {
            return Err(Error::validation_with_context(
                format!("Exceeded by {} characters", over),
                ErrorContext::new()
                    .with_field_path("text")
                    .with_details(self.counter_label()),
            ));
        }
        if api_key.trim().is_empty() {
            return Err(Error::auth("Please enter your ElevenLabs API key"));
        }
        if is_loading {
            return Err(Error::validation("A request is already in flight"));
        }
        Ok(())
    }

    /// Forward the current fields to `session`. Rejected submissions never
    /// reach the session.
    pub async fn submit<'s>(
        &self,
        session: &'s mut SynthesisSession,
        api_key: &str,
    ) -> Result<&'s PlayableAudio> {
        self.check(api_key, session.is_loading())?;
        session.generate(api_key, &self.to_request()).await
    }
}
