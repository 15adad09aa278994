//! Application error types with rich context

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Terminal/TUI Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Terminal error: {message}")]
    Terminal { message: String },

    #[error("Failed to initialize terminal: {0}")]
    TerminalInit(String),

    #[error("Clipboard error: {message}")]
    Clipboard { message: String },

    // ─────────────────────────────────────────────────────────────
    // LIME Service Errors
    // ─────────────────────────────────────────────────────────────
    #[error("HTTP request failed: {message}")]
    Http { message: String },

    #[error("Console socket error: {message}")]
    Socket { message: String },

    #[error("Console protocol error: {message}")]
    Protocol { message: String },

    #[error("Invalid server URL: {url}")]
    InvalidUrl { url: String },

    // ─────────────────────────────────────────────────────────────
    // Job Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Job '{job_id}' is already registered")]
    DuplicateJob { job_id: String },

    #[error("Unknown job '{job_id}'")]
    UnknownJob { job_id: String },

    #[error("Invalid job id: {reason}")]
    InvalidJobId { reason: String },

    // ─────────────────────────────────────────────────────────────
    // Navigation Errors
    // ─────────────────────────────────────────────────────────────
    #[error("No navigation node with key \"{key}\"")]
    NoSuchNode { key: String },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    // ─────────────────────────────────────────────────────────────
    // Channel/Communication Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Channel closed unexpectedly")]
    ChannelClosed,
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn terminal(message: impl Into<String>) -> Self {
        Self::Terminal {
            message: message.into(),
        }
    }

    pub fn clipboard(message: impl Into<String>) -> Self {
        Self::Clipboard {
            message: message.into(),
        }
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::Http {
            message: message.into(),
        }
    }

    pub fn socket(message: impl Into<String>) -> Self {
        Self::Socket {
            message: message.into(),
        }
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    pub fn invalid_url(url: impl Into<String>) -> Self {
        Self::InvalidUrl { url: url.into() }
    }

    pub fn duplicate_job(job_id: impl Into<String>) -> Self {
        Self::DuplicateJob {
            job_id: job_id.into(),
        }
    }

    pub fn unknown_job(job_id: impl Into<String>) -> Self {
        Self::UnknownJob {
            job_id: job_id.into(),
        }
    }

    pub fn invalid_job_id(reason: impl Into<String>) -> Self {
        Self::InvalidJobId {
            reason: reason.into(),
        }
    }

    pub fn no_such_node(key: impl Into<String>) -> Self {
        Self::NoSuchNode { key: key.into() }
    }

    /// Errors the console cannot start or keep running with
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::TerminalInit(_) | Error::InvalidUrl { .. } | Error::ConfigNotFound { .. }
        )
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Context Extensions (for use with color-eyre)
// ─────────────────────────────────────────────────────────────────

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", context.into(), err);
            err
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err = e.into();
            tracing::error!("{}: {:?}", f(), err);
            err
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_messages() {
        let err = Error::http("500 Internal Server Error");
        assert_eq!(
            err.to_string(),
            "HTTP request failed: 500 Internal Server Error"
        );

        let err = Error::duplicate_job("job_0");
        assert_eq!(err.to_string(), "Job 'job_0' is already registered");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_error_from_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn test_error_is_fatal() {
        assert!(Error::TerminalInit("no tty".into()).is_fatal());
        assert!(Error::invalid_url("ftp://nowhere").is_fatal());
        assert!(Error::ConfigNotFound {
            path: PathBuf::from("/missing.json")
        }
        .is_fatal());
        assert!(!Error::http("timeout").is_fatal());
    }

    #[test]
    fn test_runtime_errors_are_not_fatal() {
        assert!(!Error::socket("reset").is_fatal());
        assert!(!Error::unknown_job("job_9").is_fatal());
        assert!(!Error::ChannelClosed.is_fatal());
    }

    #[test]
    fn test_no_such_node_quotes_key() {
        let err = Error::no_such_node("QoS");
        assert_eq!(err.to_string(), "No navigation node with key \"QoS\"");
    }

    #[test]
    fn test_result_ext_context_preserves_error() {
        let res: std::result::Result<(), Error> = Err(Error::unknown_job("job_1"));
        let err = res.context("applying datapoint").unwrap_err();
        assert!(matches!(err, Error::UnknownJob { .. }));
    }

    #[test]
    fn test_result_ext_with_context_converts_error() {
        let res: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::BrokenPipe,
            "pipe closed",
        ));
        let err = res
            .with_context(|| format!("sending rate control for {}", "job_0"))
            .unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
