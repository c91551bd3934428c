//! Errors raised while introspecting a token.
//!
//! The cache never produces these itself. They come from the
//! [`Introspector`](crate::Introspector) implementation that talks to the
//! authorization server, and callers decide whether to retry.

use thiserror::Error;

/// Errors that can occur when asking the authorization server about a token.
#[derive(Debug, Error)]
pub enum IntrospectionError {
    /// The authorization server could not be reached.
    #[error("introspection endpoint unavailable: {reason}")]
    Unavailable {
        /// What went wrong
        reason: String,
        /// Underlying error, if any
        #[source]
        cause: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The request did not complete in time.
    #[error("introspection timed out after {millis}ms")]
    Timeout {
        /// Elapsed time in milliseconds
        millis: u64,
    },

    /// The server answered with a non-success status.
    #[error("introspection rejected with status {status}")]
    Rejected {
        /// HTTP status code returned by the server
        status: u16,
    },

    /// The response body could not be understood.
    #[error("malformed introspection response: {0}")]
    Malformed(String),
}

impl IntrospectionError {
    /// Creates an Unavailable error without a cause.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
            cause: None,
        }
    }

    /// Creates an Unavailable error with a cause.
    pub fn unavailable_with_cause<E>(reason: impl Into<String>, cause: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Unavailable {
            reason: reason.into(),
            cause: Some(Box::new(cause)),
        }
    }

    /// Creates a Malformed error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed(message.into())
    }

    /// Returns true if this is a transient error that might succeed on retry.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Unavailable { .. } | Self::Timeout { .. } => true,
            Self::Rejected { status } => *status == 429 || *status >= 500,
            Self::Malformed(_) => false,
        }
    }
}

impl From<serde_json::Error> for IntrospectionError {
    fn from(err: serde_json::Error) -> Self {
        Self::Malformed(err.to_string())
    }
}

/// Type alias for Results with IntrospectionError.
pub type Result<T> = std::result::Result<T, IntrospectionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IntrospectionError::unavailable("connection refused");
        assert_eq!(
            err.to_string(),
            "introspection endpoint unavailable: connection refused"
        );

        let err = IntrospectionError::Timeout { millis: 1500 };
        assert_eq!(err.to_string(), "introspection timed out after 1500ms");

        let err = IntrospectionError::Rejected { status: 401 };
        assert_eq!(err.to_string(), "introspection rejected with status 401");
    }

    #[test]
    fn test_is_transient() {
        assert!(IntrospectionError::unavailable("network").is_transient());
        assert!(IntrospectionError::Timeout { millis: 10 }.is_transient());
        assert!(IntrospectionError::Rejected { status: 503 }.is_transient());
        assert!(IntrospectionError::Rejected { status: 429 }.is_transient());
        assert!(!IntrospectionError::Rejected { status: 401 }.is_transient());
        assert!(!IntrospectionError::malformed("not json").is_transient());
    }

    #[test]
    fn test_source_chain() {
        use std::error::Error;

        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        let err = IntrospectionError::unavailable_with_cause("socket closed", io);
        assert!(err.source().is_some());
    }

    #[test]
    fn test_from_serde_error() {
        let parse = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: IntrospectionError = parse.into();
        assert!(matches!(err, IntrospectionError::Malformed(_)));
    }
}
