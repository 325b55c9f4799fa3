use thiserror::Error;

/// Structured error context for better error handling and debugging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorContext {
    /// Field or configuration key that caused the error (e.g., "form.text", "config.base_url")
    pub field_path: Option<String>,
    /// Additional context about the error (e.g., limit, actual value)
    pub details: Option<String>,
    /// Source of the error (e.g., "credentials", "client", "playback")
    pub source: Option<String>,
}

impl ErrorContext {
    pub fn new() -> Self {
        Self {
            field_path: None,
            details: None,
            source: None,
        }
    }

    pub fn with_field_path(mut self, path: impl Into<String>) -> Self {
        self.field_path = Some(path.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Coarse error category, used by front ends to decide how to surface a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Auth,
    Validation,
    Network,
    Provider,
    Resource,
    Configuration,
    Storage,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Auth => "auth",
            Self::Validation => "validation",
            Self::Network => "network",
            Self::Provider => "provider",
            Self::Resource => "resource",
            Self::Configuration => "configuration",
            Self::Storage => "storage",
        }
    }
}

/// Unified error type for VoiceForge.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or rejected credential. `status` is set when the provider rejected it.
    #[error("Authentication error: {message}{}", format_status(.status, .status_text))]
    Auth {
        message: String,
        status: Option<u16>,
        status_text: Option<String>,
    },

    #[error("Validation error: {message}{}", format_context(.context))]
    Validation {
        message: String,
        context: ErrorContext,
    },

    #[error("Network error: {message}{}", format_context(.context))]
    Network {
        message: String,
        context: ErrorContext,
    },

    /// Non-success response from the provider.
    #[error("ElevenLabs API error: {status} {status_text}: {message}")]
    Provider {
        status: u16,
        status_text: String,
        message: String,
    },

    /// Audio reference or playback failure.
    #[error("Audio resource error: {message}{}", format_context(.context))]
    Resource {
        message: String,
        context: ErrorContext,
    },

    #[error("Configuration error: {message}{}", format_context(.context))]
    Configuration {
        message: String,
        context: ErrorContext,
    },

    #[error("Credential storage error: {0}")]
    Credential(#[from] keyring::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_yaml::Error),
}

fn format_context(ctx: &ErrorContext) -> String {
    let mut parts = Vec::new();
    if let Some(ref field) = ctx.field_path {
        parts.push(format!("field: {}", field));
    }
    if let Some(ref details) = ctx.details {
        parts.push(format!("details: {}", details));
    }
    if let Some(ref source) = ctx.source {
        parts.push(format!("source: {}", source));
    }
    if parts.is_empty() {
        String::new()
    } else {
        format!(" ({})", parts.join(", "))
    }
}

fn format_status(status: &Option<u16>, status_text: &Option<String>) -> String {
    match (status, status_text) {
        (Some(code), Some(text)) => format!(" (HTTP {} {})", code, text),
        (Some(code), None) => format!(" (HTTP {})", code),
        _ => String::new(),
    }
}

impl Error {
    pub fn auth(msg: impl Into<String>) -> Self {
        Error::Auth {
            message: msg.into(),
            status: None,
            status_text: None,
        }
    }

    /// Credential rejected by the provider with the given HTTP status.
    pub fn auth_rejected(
        msg: impl Into<String>,
        status: u16,
        status_text: impl Into<String>,
    ) -> Self {
        Error::Auth {
            message: msg.into(),
            status: Some(status),
            status_text: Some(status_text.into()),
        }
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::validation_with_context(msg, ErrorContext::new())
    }

    pub fn validation_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Validation {
            message: msg.into(),
            context,
        }
    }

    pub fn network_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Network {
            message: msg.into(),
            context,
        }
    }

    pub fn resource(msg: impl Into<String>) -> Self {
        Self::resource_with_context(msg, ErrorContext::new())
    }

    pub fn resource_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Resource {
            message: msg.into(),
            context,
        }
    }

    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::configuration_with_context(msg, ErrorContext::new())
    }

    pub fn configuration_with_context(msg: impl Into<String>, context: ErrorContext) -> Self {
        Error::Configuration {
            message: msg.into(),
            context,
        }
    }

    /// Map a non-success provider response onto the taxonomy.
    ///
    /// 401 and 403 are credential problems; everything else is a provider error.
    pub fn from_status(status: u16, status_text: impl Into<String>, message: impl Into<String>) -> Self {
        let status_text = status_text.into();
        let message = message.into();
        match status {
            401 | 403 => Error::auth_rejected(message, status, status_text),
            _ => Error::Provider {
                status,
                status_text,
                message,
            },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Auth { .. } => ErrorKind::Auth,
            Error::Validation { .. } => ErrorKind::Validation,
            Error::Network { .. } => ErrorKind::Network,
            Error::Provider { .. } => ErrorKind::Provider,
            Error::Resource { .. } => ErrorKind::Resource,
            Error::Configuration { .. } | Error::ConfigParse(_) => ErrorKind::Configuration,
            Error::Credential(_) | Error::Io(_) | Error::Serialization(_) => ErrorKind::Storage,
        }
    }

    /// HTTP status reported by the provider, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Auth { status, .. } => *status,
            Error::Provider { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the user can fix the problem from the form (edit text, set a key).
    pub fn is_user_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::Auth | ErrorKind::Validation)
    }

    /// Extract error context if available
    pub fn context(&self) -> Option<&ErrorContext> {
        match self {
            Error::Validation { context, .. }
            | Error::Network { context, .. }
            | Error::Resource { context, .. }
            | Error::Configuration { context, .. } => Some(context),
            _ => None,
        }
    }
}
