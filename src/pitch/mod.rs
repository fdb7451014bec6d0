//! Project pitch generation.
//!
//! A pitch is generated by POSTing the visitor's business problem to the
//! pitch endpoint, which streams back `data: {"content": "..."}` lines. This
//! module is split into:
//! - `decoder`: stream-safe UTF-8 decoding and `data:` line parsing
//! - `client`: the HTTP backend and the read loop
//! - `session`: the accumulator and the generation state machine

mod client;
pub mod decoder;
mod session;

pub use client::{error_message_from_body, pump_fragments, HttpPitchClient, GENERIC_FAILURE};
pub use session::{PitchPhase, PitchSession, SingleFlight, SubmitOutcome};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Request body sent to the pitch endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PitchRequest {
    pub business_problem: String,
}

impl PitchRequest {
    /// Build a request, rejecting empty or whitespace-only input.
    pub fn new(problem: impl Into<String>) -> Result<Self, PitchError> {
        let business_problem = problem.into();
        if business_problem.trim().is_empty() {
            return Err(PitchError::EmptyProblem);
        }
        Ok(Self { business_problem })
    }
}

/// One `data:` payload from the stream.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StreamFragment {
    pub content: String,
}

/// Events sent from the read loop to the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PitchEvent {
    /// The endpoint accepted the request and the body is being read.
    Streaming,
    /// A fragment of generated text, in arrival order.
    Fragment(String),
    /// The stream ended normally.
    Done,
    /// The request failed; no further events follow.
    Error(PitchError),
}

/// Errors that end a generation cycle.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PitchError {
    /// Nothing to pitch. Never shown to the user.
    #[error("business problem is empty")]
    EmptyProblem,

    /// The request could not be sent.
    #[error("Could not reach the pitch service: {0}")]
    Network(String),

    /// The endpoint answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The endpoint answered without a body.
    #[error("The pitch service returned an empty response")]
    EmptyBody,

    /// Reading the body failed part way through.
    #[error("The pitch stream was interrupted: {0}")]
    Stream(String),
}

impl PitchError {
    /// Whether this error should be displayed in the pitch view.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, PitchError::EmptyProblem)
    }
}

impl From<reqwest::Error> for PitchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Network("request timed out".to_string())
        } else if err.is_connect() {
            Self::Network(format!("connection failed: {}", err))
        } else {
            Self::Network(err.to_string())
        }
    }
}

/// Something that can turn a pitch request into a stream of events.
///
/// The returned receiver yields [`PitchEvent`]s until `Done` or `Error`.
/// Implementations must stop sending once `cancel` is triggered.
pub trait PitchBackend: Send + Sync {
    /// Start streaming a pitch for `request`.
    fn stream_pitch(
        &self,
        request: PitchRequest,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<PitchEvent>;

    /// Human-readable name of the endpoint, for the status line.
    fn describe(&self) -> String;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_request_rejects_blank() {
        assert_eq!(PitchRequest::new(""), Err(PitchError::EmptyProblem));
        assert_eq!(PitchRequest::new("  \n\t "), Err(PitchError::EmptyProblem));
    }

    #[test]
    fn test_pitch_request_serializes_camel_case() {
        let request = PitchRequest::new("Slow checkout").unwrap();
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"businessProblem":"Slow checkout"}"#);
    }

    #[test]
    fn test_stream_fragment_requires_content() {
        assert!(serde_json::from_str::<StreamFragment>(r#"{"content":"Hi"}"#).is_ok());
        assert!(serde_json::from_str::<StreamFragment>(r#"{"text":"Hi"}"#).is_err());
    }

    #[test]
    fn test_pitch_error_display() {
        let err = PitchError::Status {
            status: 429,
            message: "Too many requests, slow down".to_string(),
        };
        assert_eq!(err.to_string(), "Too many requests, slow down");
        assert!(err.is_user_visible());
        assert!(!PitchError::EmptyProblem.is_user_visible());
        assert_eq!(
            PitchError::EmptyBody.to_string(),
            "The pitch service returned an empty response"
        );
    }
}
