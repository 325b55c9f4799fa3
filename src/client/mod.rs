//! Synthesis client: the provider's voice listing, key validation and
//! text-to-speech endpoints.

mod elevenlabs;
mod types;

pub use elevenlabs::{ElevenLabsClient, ElevenLabsClientBuilder};
pub use types::{
    SynthesisRequest, VoiceSettings, DEFAULT_SIMILARITY_BOOST, DEFAULT_SPEAKER_BOOST,
    DEFAULT_STABILITY, DEFAULT_STYLE,
};

use crate::audio::PlayableAudio;
use crate::catalog::Voice;
use crate::Result;
use async_trait::async_trait;

/// The three provider operations the rest of the crate depends on.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn list_voices(&self, api_key: &str) -> Result<Vec<Voice>>;

    /// Never fails: any transport or HTTP failure resolves `false`.
    async fn validate_key(&self, api_key: &str) -> bool;

    /// Returns the audio plus a freshly minted playable reference.
    async fn synthesize(&self, request: &SynthesisRequest, api_key: &str) -> Result<PlayableAudio>;
}
