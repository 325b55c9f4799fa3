//! # voiceforge
//!
//! Text-to-speech front end for the ElevenLabs API.
//!
//! ## Overview
//!
//! The crate covers one request-and-playback cycle: keep an API credential,
//! browse and search the voice catalog, submit a synthesis request, then play
//! or save the returned audio. Every failure is recovered at the
//! orchestration boundary and reported through a notification sink.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voiceforge::{ElevenLabsClient, SpeechForm, SynthesisSession};
//!
//! #[tokio::main]
//! async fn main() -> voiceforge::Result<()> {
//!     let client = Arc::new(ElevenLabsClient::builder().build()?);
//!     let mut session = SynthesisSession::new(client);
//!
//!     let mut form = SpeechForm::new();
//!     form.set_text("Hello world");
//!
//!     let audio = form.submit(&mut session, "your-api-key").await?;
//!     println!("{} bytes at {}", audio.payload.len(), audio.url);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`credentials`] | API key store with file, keyring and memory backends |
//! | [`catalog`] | Built-in and remote voices, models, search and category filters |
//! | [`client`] | ElevenLabs HTTP client and the [`SpeechProvider`] seam |
//! | [`audio`] | Audio payloads and revocable playable references |
//! | [`synthesis`] | Session state machine and notifications |
//! | [`playback`] | Audio player driven by element events |
//! | [`form`] | Form field state and submission gating |
//! | [`config`] | Defaults, YAML file and environment overrides |

pub mod audio;
pub mod catalog;
pub mod client;
pub mod config;
pub mod credentials;
pub mod form;
pub mod playback;
pub mod synthesis;

pub use audio::{AudioFormat, AudioPayload, ObjectUrl, ObjectUrlRegistry, PlayableAudio};
pub use catalog::{CatalogState, CategoryFilter, Model, Voice, VoiceCatalog, VoiceFilter};
pub use client::{ElevenLabsClient, ElevenLabsClientBuilder, SpeechProvider, SynthesisRequest};
pub use config::Config;
pub use credentials::CredentialStore;
pub use form::SpeechForm;
pub use playback::{AudioElement, AudioPlayer, PlayerEvent, SimulatedElement};
pub use synthesis::{Notification, NotificationSink, SessionState, SynthesisSession};

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the library
pub mod error;
pub use error::{Error, ErrorContext, ErrorKind};
