//! Synthesis orchestration: validation, submission, loading state and the
//! single live result.

mod notify;
mod session;

pub use notify::{
    noop_sink, CompositeSink, ConsoleSink, InMemorySink, Level, NoopSink, Notification,
    NotificationSink, TracingSink,
};
pub use session::{SessionState, SynthesisSession, MAX_TEXT_LENGTH};
