//! Form → session → player flow against a mock provider.

mod common;

use common::{MockServerFixture, FAKE_MP3, TEST_KEY};
use std::sync::Arc;
use voiceforge::catalog::DEFAULT_VOICE;
use voiceforge::synthesis::{InMemorySink, Level, MAX_TEXT_LENGTH};
use voiceforge::{
    AudioPlayer, ErrorKind, SessionState, SimulatedElement, SpeechForm, SynthesisSession,
};

#[tokio::test]
async fn test_empty_text_never_reaches_network() {
    let mut fx = MockServerFixture::new().await;
    let user = fx
        .server
        .mock("GET", "/v1/user")
        .expect(0)
        .create_async()
        .await;
    let speech = fx.mock_speech_unreachable().await;

    let mut session = SynthesisSession::new(Arc::new(fx.client()));
    let form = SpeechForm::new();
    let err = form.submit(&mut session, TEST_KEY).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    user.assert_async().await;
    speech.assert_async().await;
}

#[tokio::test]
async fn test_whitespace_key_never_reaches_network() {
    let mut fx = MockServerFixture::new().await;
    let user = fx
        .server
        .mock("GET", "/v1/user")
        .expect(0)
        .create_async()
        .await;
    let speech = fx.mock_speech_unreachable().await;

    let mut session = SynthesisSession::new(Arc::new(fx.client()));
    let mut form = SpeechForm::new();
    form.set_text("Hello world");
    let err = form.submit(&mut session, "   ").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Auth);
    assert_eq!(session.state(), SessionState::Idle);
    user.assert_async().await;
    speech.assert_async().await;
}

#[tokio::test]
async fn test_over_length_text_never_reaches_network() {
    let mut fx = MockServerFixture::new().await;
    let speech = fx.mock_speech_unreachable().await;

    let mut session = SynthesisSession::new(Arc::new(fx.client()));
    let mut form = SpeechForm::new();
    form.set_text("x".repeat(MAX_TEXT_LENGTH + 10));
    let err = form.submit(&mut session, TEST_KEY).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Validation);
    assert!(err.to_string().contains("Exceeded by 10 characters"));
    speech.assert_async().await;
}

#[tokio::test]
async fn test_generate_play_download_reset() {
    let mut fx = MockServerFixture::new().await;
    let user = fx.mock_user(200).await;
    let speech = fx.mock_speech(DEFAULT_VOICE, 2).await;

    let sink = Arc::new(InMemorySink::new());
    let mut session = SynthesisSession::new(Arc::new(fx.client())).with_notifier(sink.clone());
    let mut form = SpeechForm::new();
    form.set_text("Hello world");

    let first = form
        .submit(&mut session, TEST_KEY)
        .await
        .unwrap()
        .url
        .as_str()
        .to_string();
    assert_eq!(session.state(), SessionState::Completed);
    assert_eq!(fx.registry.live_count(), 1);

    let audio = form.submit(&mut session, TEST_KEY).await.unwrap();
    assert_eq!(audio.payload.data.as_ref(), FAKE_MP3);
    assert_ne!(audio.url.as_str(), first);

    let mut player = AudioPlayer::new(
        SimulatedElement::new(fx.registry.clone()),
        fx.registry.clone(),
    );
    player.load(session.current());
    assert_eq!(fx.registry.live_count(), 1);
    assert!(!fx.registry.is_live(&first));
    assert!(player.controls_enabled());
    player.toggle_play_pause().unwrap();
    assert!(player.is_playing());

    let dir = tempfile::tempdir().unwrap();
    let saved = player.download(dir.path()).unwrap();
    assert_eq!(std::fs::read(saved).unwrap(), FAKE_MP3);
    assert_eq!(fx.registry.live_count(), 1);

    session.reset();
    assert_eq!(fx.registry.live_count(), 0);
    assert!(!player.controls_enabled());

    user.assert_async().await;
    speech.assert_async().await;
    assert_eq!(
        sink.events().iter().filter(|n| n.level == Level::Success).count(),
        2
    );
}

#[tokio::test]
async fn test_rejected_key_blocks_synthesis() {
    let mut fx = MockServerFixture::new().await;
    fx.mock_user(401).await;
    let speech = fx.mock_speech_unreachable().await;

    let sink = Arc::new(InMemorySink::new());
    let mut session = SynthesisSession::new(Arc::new(fx.client())).with_notifier(sink.clone());
    let mut form = SpeechForm::new();
    form.set_text("Hello world");

    let err = form.submit(&mut session, TEST_KEY).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Auth);
    assert_eq!(session.state(), SessionState::Invalid);
    assert_eq!(sink.errors()[0].message, "Invalid ElevenLabs API key");
    speech.assert_async().await;
}

#[tokio::test]
async fn test_provider_outage_recovers_to_ready() {
    let mut fx = MockServerFixture::new().await;
    fx.mock_user(200).await;
    let path = format!("/v1/text-to-speech/{}", DEFAULT_VOICE);
    fx.mock_error("POST", &path, 503, r#"{"detail":{"message":"overloaded"}}"#)
        .await;

    let mut session = SynthesisSession::new(Arc::new(fx.client()));
    let mut form = SpeechForm::new();
    form.set_text("Hello world");

    let err = form.submit(&mut session, TEST_KEY).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Provider);
    assert_eq!(err.status(), Some(503));
    assert_eq!(session.state(), SessionState::Ready);
    assert!(form.can_submit(true, session.is_loading()));
    assert_eq!(fx.registry.live_count(), 0);
}
