//! Common error types used across the workspace.
//!
//! Each failure source has its own typed error; [`BarrelHubError`] gathers
//! them through `#[from]` conversions.

/// Top-level error for the client core.
#[derive(Debug, thiserror::Error)]
pub enum BarrelHubError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("malformed envelope: {0}")]
    Envelope(#[from] EnvelopeError),

    #[error("event feed error: {0}")]
    Feed(#[from] FeedError),

    #[error("runtime error: {0}")]
    Runtime(#[from] RuntimeError),
}

/// A request reached the transport and failed there (network or server side).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("request to {path} failed: {message}")]
pub struct TransportError {
    /// Path of the failed request.
    pub path: String,
    /// Server status code, when the server answered.
    pub status: Option<u16>,
    /// Human readable reason.
    pub message: String,
}

impl TransportError {
    /// Failure without a server status (connection lost, socket closed, …).
    #[must_use]
    pub fn network(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: None,
            message: message.into(),
        }
    }

    /// Failure reported by the server with a status code.
    #[must_use]
    pub fn status(path: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: Some(status),
            message: message.into(),
        }
    }
}

/// A response body did not match the expected shape.
#[derive(Debug, thiserror::Error)]
#[error("invalid response body for {context}")]
pub struct DecodeError {
    /// What was being decoded (usually the request path).
    pub context: String,
    #[source]
    pub source: serde_json::Error,
}

/// A feed envelope could not be turned into a typed change.
#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("unknown verb '{0}'")]
    UnknownVerb(String),

    #[error("'{verb}' envelope carries no data")]
    MissingData { verb: &'static str },

    #[error("envelope data does not match the record shape")]
    InvalidData(#[source] serde_json::Error),

    #[error("envelope id is not a valid identifier")]
    InvalidId(#[source] serde_json::Error),
}

/// Event feed wiring failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeedError {
    #[error("a handler is already registered for topic '{0}'")]
    DuplicateTopic(String),
}

/// Background work could not be scheduled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no async runtime available to run {task}")]
pub struct RuntimeError {
    pub task: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_convert_transport_error_into_top_level_error() {
        let err: BarrelHubError = TransportError::status("/team", 403, "forbidden").into();
        assert!(matches!(
            err,
            BarrelHubError::Transport(TransportError {
                status: Some(403),
                ..
            })
        ));
        assert_eq!(
            err.to_string(),
            "transport error: request to /team failed: forbidden"
        );
    }

    #[test]
    fn should_describe_duplicate_topic() {
        let err = FeedError::DuplicateTopic("barrel".to_string());
        assert_eq!(
            err.to_string(),
            "a handler is already registered for topic 'barrel'"
        );
    }
}
