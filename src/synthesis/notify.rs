//! Transient user-facing notifications (success / error toasts).

use crate::{ErrorKind, Result};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    /// Category of the failure, for error notifications.
    pub kind: Option<ErrorKind>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
            kind: None,
        }
    }

    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
            kind: Some(kind),
        }
    }
}

#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, notification: Notification) -> Result<()>;
}

pub struct NoopSink;

#[async_trait]
impl NotificationSink for NoopSink {
    async fn notify(&self, _notification: Notification) -> Result<()> {
        Ok(())
    }
}

pub fn noop_sink() -> Arc<dyn NotificationSink> {
    Arc::new(NoopSink)
}

/// In-memory sink for testing.
#[derive(Default)]
pub struct InMemorySink {
    events: RwLock<Vec<Notification>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn events(&self) -> Vec<Notification> {
        self.events.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
    pub fn errors(&self) -> Vec<Notification> {
        self.events()
            .into_iter()
            .filter(|n| n.level == Level::Error)
            .collect()
    }
    pub fn clear(&self) {
        self.events.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
    pub fn len(&self) -> usize {
        self.events.read().unwrap_or_else(|e| e.into_inner()).len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl NotificationSink for InMemorySink {
    async fn notify(&self, notification: Notification) -> Result<()> {
        self.events
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(notification);
        Ok(())
    }
}

/// Routes notifications into the log.
pub struct TracingSink;

#[async_trait]
impl NotificationSink for TracingSink {
    async fn notify(&self, notification: Notification) -> Result<()> {
        match notification.level {
            Level::Success => tracing::info!(message = %notification.message, "notification"),
            Level::Error => tracing::warn!(
                kind = notification.kind.map(|k| k.as_str()).unwrap_or("unknown"),
                message = %notification.message,
                "notification"
            ),
        }
        Ok(())
    }
}

/// Writes notifications to stderr.
pub struct ConsoleSink {
    prefix: String,
}

impl ConsoleSink {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new("voiceforge:")
    }
}

#[async_trait]
impl NotificationSink for ConsoleSink {
    async fn notify(&self, notification: Notification) -> Result<()> {
        let tag = match notification.level {
            Level::Success => "ok",
            Level::Error => "error",
        };
        eprintln!("{} {}: {}", self.prefix, tag, notification.message);
        Ok(())
    }
}

/// Fans out to several sinks; individual sink failures are ignored.
#[derive(Default)]
pub struct CompositeSink {
    sinks: Vec<Arc<dyn NotificationSink>>,
}

impl CompositeSink {
    pub fn new() -> Self {
        Self::default()
    }
    pub fn add_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sinks.push(sink);
        self
    }
}

#[async_trait]
impl NotificationSink for CompositeSink {
    async fn notify(&self, notification: Notification) -> Result<()> {
        for s in &self.sinks {
            let _ = s.notify(notification.clone()).await;
        }
        Ok(())
    }
}
