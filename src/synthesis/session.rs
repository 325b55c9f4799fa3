use super::notify::{noop_sink, Notification, NotificationSink};
use crate::audio::PlayableAudio;
use crate::client::{SpeechProvider, SynthesisRequest};
use crate::{Error, ErrorContext, ErrorKind, Result};
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{info, warn};

/// Maximum characters accepted per submission.
pub const MAX_TEXT_LENGTH: usize = 5000;

const MISSING_KEY: &str = "Please enter your ElevenLabs API key";
const INVALID_KEY: &str = "Invalid ElevenLabs API key";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Validating,
    Invalid,
    Ready,
    Generating,
    Completed,
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Validating | Self::Generating)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::Invalid => "invalid",
            Self::Ready => "ready",
            Self::Generating => "generating",
            Self::Completed => "completed",
        };
        f.write_str(s)
    }
}

/// Validity outcome cached for one credential value.
struct KeyCheck {
    key: String,
    valid: bool,
}

/// Coordinates key validation, submission and result storage for one form.
///
/// Holds at most one [`PlayableAudio`]; installing a new result or resetting
/// revokes the previous reference first.
pub struct SynthesisSession {
    provider: Arc<dyn SpeechProvider>,
    notifier: Arc<dyn NotificationSink>,
    state: watch::Sender<SessionState>,
    key_check: Option<KeyCheck>,
    current: Option<PlayableAudio>,
    max_text_length: usize,
}

impl SynthesisSession {
    pub fn new(provider: Arc<dyn SpeechProvider>) -> Self {
        let (state, _) = watch::channel(SessionState::Idle);
        Self {
            provider,
            notifier: noop_sink(),
            state,
            key_check: None,
            current: None,
            max_text_length: MAX_TEXT_LENGTH,
        }
    }

    pub fn with_notifier(mut self, notifier: Arc<dyn NotificationSink>) -> Self {
        self.notifier = notifier;
        self
    }

    pub fn with_max_text_length(mut self, max: usize) -> Self {
        self.max_text_length = max;
        self
    }

    pub fn state(&self) -> SessionState {
        *self.state.borrow()
    }

    /// Observe state transitions (e.g. to disable controls while loading).
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn is_loading(&self) -> bool {
        self.state().is_loading()
    }

    /// Cached validity for `api_key`, `None` if not yet checked.
    pub fn key_validity(&self, api_key: &str) -> Option<bool> {
        self.key_check
            .as_ref()
            .filter(|c| c.key == api_key)
            .map(|c| c.valid)
    }

    pub fn current(&self) -> Option<&PlayableAudio> {
        self.current.as_ref()
    }

    pub fn max_text_length(&self) -> usize {
        self.max_text_length
    }

    fn transition(&self, next: SessionState) {
        let prev = self.state.send_replace(next);
        if prev != next {
            info!(from = %prev, to = %next, "session state");
        }
    }

    async fn report(&self, err: &Error, message: impl Into<String>) {
        let _ = self
            .notifier
            .notify(Notification::error(err.kind(), message))
            .await;
    }

    /// Validate `api_key` against the provider and cache the outcome.
    pub async fn check_key(&mut self, api_key: &str) -> bool {
        if api_key.trim().is_empty() {
            self.key_check = Some(KeyCheck {
                key: String::new(),
                valid: false,
            });
            self.transition(SessionState::Invalid);
            return false;
        }
        self.transition(SessionState::Validating);
        let valid = self.provider.validate_key(api_key).await;
        self.key_check = Some(KeyCheck {
            key: api_key.to_string(),
            valid,
        });
        self.transition(if valid {
            SessionState::Ready
        } else {
            SessionState::Invalid
        });
        valid
    }

    fn check_text(&self, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Err(Error::validation_with_context(
                "Text must not be empty",
                ErrorContext::new().with_field_path("text"),
            ));
        }
        let len = text.chars().count();
        if len > self.max_text_length {
            return Err(Error::validation_with_context(
                format!(
                    "Text exceeds maximum length by {} characters",
                    len - self.max_text_length
                ),
                ErrorContext::new()
                    .with_field_path("text")
                    .with_details(format!("{} > {}", len, self.max_text_length)),
            ));
        }
        Ok(())
    }

    /// Submit `request`. Preconditions that fail leave the state untouched and
    /// issue no request; provider failures return the session to `Ready`.
    pub async fn generate(
        &mut self,
        api_key: &str,
        request: &SynthesisRequest,
    ) -> Result<&PlayableAudio> {
        if api_key.trim().is_empty() {
            let err = Error::auth(MISSING_KEY);
            self.report(&err, MISSING_KEY).await;
            return Err(err);
        }
        if let Err(err) = self.check_text(&request.text) {
            self.report(&err, err.to_string()).await;
            return Err(err);
        }

        let valid = match self.key_validity(api_key) {
            Some(valid) => valid,
            None => self.check_key(api_key).await,
        };
        if !valid {
            self.transition(SessionState::Invalid);
            let err = Error::auth(INVALID_KEY);
            self.report(&err, INVALID_KEY).await;
            return Err(err);
        }

        self.transition(SessionState::Generating);
        match self.provider.synthesize(request, api_key).await {
            Ok(audio) => {
                if let Some(previous) = self.current.take() {
                    previous.release();
                }
                info!(
                    bytes = audio.payload.len(),
                    url = %audio.url,
                    "audio generated"
                );
                self.transition(SessionState::Completed);
                let _ = self
                    .notifier
                    .notify(Notification::success("Audio generated successfully"))
                    .await;
                Ok(self.current.insert(audio))
            }
            Err(err) => {
                warn!(error = %err, "error generating speech");
                if err.kind() == ErrorKind::Auth {
                    self.key_check = None;
                }
                self.transition(SessionState::Ready);
                self.report(&err, format!("Error generating speech: {}", err))
                    .await;
                Err(err)
            }
        }
    }

    /// Release the current reference and return to `Idle`.
    pub fn reset(&mut self) {
        if let Some(previous) = self.current.take() {
            previous.release();
        }
        self.transition(SessionState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioFormat, AudioPayload, ObjectUrlRegistry};
    use crate::catalog::Voice;
    use crate::synthesis::InMemorySink;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeProvider {
        registry: ObjectUrlRegistry,
        valid: bool,
        fail_with: Option<u16>,
        validations: AtomicUsize,
        syntheses: AtomicUsize,
    }

    impl FakeProvider {
        fn new(valid: bool) -> Self {
            Self {
                registry: ObjectUrlRegistry::new(),
                valid,
                fail_with: None,
                validations: AtomicUsize::new(0),
                syntheses: AtomicUsize::new(0),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                fail_with: Some(status),
                ..Self::new(true)
            }
        }

        fn requests(&self) -> usize {
            self.validations.load(Ordering::SeqCst) + self.syntheses.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl SpeechProvider for FakeProvider {
        async fn list_voices(&self, _api_key: &str) -> Result<Vec<Voice>> {
            Ok(Vec::new())
        }

        async fn validate_key(&self, _api_key: &str) -> bool {
            self.validations.fetch_add(1, Ordering::SeqCst);
            self.valid
        }

        async fn synthesize(
            &self,
            request: &SynthesisRequest,
            _api_key: &str,
        ) -> Result<PlayableAudio> {
            self.syntheses.fetch_add(1, Ordering::SeqCst);
            if let Some(status) = self.fail_with {
                return Err(Error::from_status(status, "Error", "failed"));
            }
            let payload = AudioPayload::new(request.text.clone().into_bytes(), AudioFormat::Mp3);
            Ok(PlayableAudio::new(payload, &self.registry))
        }
    }

    fn session(provider: &Arc<FakeProvider>) -> (SynthesisSession, Arc<InMemorySink>) {
        let sink = Arc::new(InMemorySink::new());
        let session = SynthesisSession::new(provider.clone()).with_notifier(sink.clone());
        (session, sink)
    }

    #[tokio::test]
    async fn test_empty_text_issues_no_request() {
        let provider = Arc::new(FakeProvider::new(true));
        let (mut session, sink) = session(&provider);
        let err = session
            .generate("sk_test", &SynthesisRequest::new("   "))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(provider.requests(), 0);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(sink.errors().len(), 1);
    }

    #[tokio::test]
    async fn test_over_length_text_issues_no_request() {
        let provider = Arc::new(FakeProvider::new(true));
        let (mut session, _) = session(&provider);
        let text = "a".repeat(MAX_TEXT_LENGTH + 1);
        let err = session
            .generate("sk_test", &SynthesisRequest::new(text))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("by 1 characters"));
        assert_eq!(provider.requests(), 0);
    }

    #[tokio::test]
    async fn test_missing_key_rejected() {
        let provider = Arc::new(FakeProvider::new(true));
        let (mut session, sink) = session(&provider);
        let err = session
            .generate("", &SynthesisRequest::new("Hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(provider.requests(), 0);
        assert_eq!(sink.errors()[0].message, MISSING_KEY);
    }

    #[tokio::test]
    async fn test_blank_key_treated_as_missing() {
        let provider = Arc::new(FakeProvider::new(true));
        let (mut session, sink) = session(&provider);
        let err = session
            .generate("  \t", &SynthesisRequest::new("Hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(provider.requests(), 0);
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(sink.errors()[0].message, MISSING_KEY);
        assert!(!session.check_key("   ").await);
        assert_eq!(provider.requests(), 0);
    }

    #[tokio::test]
    async fn test_validation_cached_for_session() {
        let provider = Arc::new(FakeProvider::new(true));
        let (mut session, _) = session(&provider);
        let request = SynthesisRequest::new("Hello world");
        session.generate("sk_test", &request).await.unwrap();
        session.generate("sk_test", &request).await.unwrap();
        assert_eq!(provider.validations.load(Ordering::SeqCst), 1);
        assert_eq!(provider.syntheses.load(Ordering::SeqCst), 2);
        assert_eq!(session.key_validity("sk_test"), Some(true));
        assert_eq!(session.key_validity("sk_other"), None);
    }

    #[tokio::test]
    async fn test_invalid_key_blocks_without_retrying_validation() {
        let provider = Arc::new(FakeProvider::new(false));
        let (mut session, _) = session(&provider);
        let request = SynthesisRequest::new("Hello");
        assert!(session.generate("sk_bad", &request).await.is_err());
        assert!(session.generate("sk_bad", &request).await.is_err());
        assert_eq!(provider.validations.load(Ordering::SeqCst), 1);
        assert_eq!(provider.syntheses.load(Ordering::SeqCst), 0);
        assert_eq!(session.state(), SessionState::Invalid);
    }

    #[tokio::test]
    async fn test_single_live_reference() {
        let provider = Arc::new(FakeProvider::new(true));
        let (mut session, _) = session(&provider);

        let first_url = session
            .generate("sk_test", &SynthesisRequest::new("one"))
            .await
            .unwrap()
            .url
            .as_str()
            .to_string();
        assert_eq!(provider.registry.live_count(), 1);

        session
            .generate("sk_test", &SynthesisRequest::new("two"))
            .await
            .unwrap();
        assert_eq!(provider.registry.live_count(), 1);
        assert!(!provider.registry.is_live(&first_url));
        assert_eq!(session.state(), SessionState::Completed);

        session.reset();
        assert_eq!(provider.registry.live_count(), 0);
        assert!(session.current().is_none());
        assert_eq!(session.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_provider_failure_returns_to_ready_and_keeps_previous() {
        let provider = Arc::new(FakeProvider::failing(500));
        let (mut session, sink) = session(&provider);
        let err = session
            .generate("sk_test", &SynthesisRequest::new("hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Provider);
        assert_eq!(session.state(), SessionState::Ready);
        assert!(!session.is_loading());
        assert!(sink.errors()[0].message.starts_with("Error generating speech"));
    }

    #[tokio::test]
    async fn test_auth_failure_drops_cached_validity() {
        let provider = Arc::new(FakeProvider::failing(401));
        let (mut session, _) = session(&provider);
        let err = session
            .generate("sk_test", &SynthesisRequest::new("hello"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Auth);
        assert_eq!(session.key_validity("sk_test"), None);
    }

    #[tokio::test]
    async fn test_subscribers_see_transitions() {
        let provider = Arc::new(FakeProvider::new(true));
        let (mut session, _) = session(&provider);
        let rx = session.subscribe();
        assert!(session.check_key("sk_test").await);
        assert_eq!(*rx.borrow(), SessionState::Ready);
        assert!(!session.check_key("").await);
        assert_eq!(*rx.borrow(), SessionState::Invalid);
    }
}
