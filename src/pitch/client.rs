//! HTTP backend for the pitch endpoint.

use std::fmt::Display;
use std::time::Duration;

use futures::{Stream, StreamExt};
use reqwest::Client;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::decoder::{FragmentDecoder, LineOutcome};
use super::{PitchBackend, PitchError, PitchEvent, PitchRequest};
use crate::config::PitchConfig;

/// Shown when a failed response carries no usable message.
pub const GENERIC_FAILURE: &str = "Failed to generate pitch. Please try again.";

/// Capacity of the per-request event channel.
const EVENT_BUFFER: usize = 100;

/// Pitch backend that talks to the pitch endpoint over HTTP.
#[derive(Clone)]
pub struct HttpPitchClient {
    client: Client,
    endpoint: String,
}

impl HttpPitchClient {
    /// Create a client for the configured endpoint.
    pub fn new(config: &PitchConfig) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "failed to build HTTP client, using defaults");
                Client::new()
            });

        Self {
            client,
            endpoint: config.endpoint.clone(),
        }
    }

    /// The URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl PitchBackend for HttpPitchClient {
    fn stream_pitch(
        &self,
        request: PitchRequest,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<PitchEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let client = self.client.clone();
        let endpoint = self.endpoint.clone();

        tokio::spawn(async move {
            let response = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    debug!("pitch request cancelled before a response arrived");
                    return;
                }
                response = open_stream(&client, &endpoint, &request) => response,
            };

            let response = match response {
                Ok(response) => response,
                Err(e) => {
                    warn!(error = %e, "pitch request failed");
                    let _ = tx.send(PitchEvent::Error(e)).await;
                    return;
                }
            };

            if tx.send(PitchEvent::Streaming).await.is_err() {
                return;
            }

            if let Err(e) = pump_fragments(response.bytes_stream(), &tx, &cancel).await {
                warn!(error = %e, "pitch stream failed");
                let _ = tx.send(PitchEvent::Error(e)).await;
            }
        });

        rx
    }

    fn describe(&self) -> String {
        self.endpoint.clone()
    }
}

/// Send the request and check the response before streaming it.
async fn open_stream(
    client: &Client,
    endpoint: &str,
    request: &PitchRequest,
) -> Result<reqwest::Response, PitchError> {
    info!(endpoint, chars = request.business_problem.len(), "requesting pitch");

    let response = client
        .post(endpoint)
        .header("Content-Type", "application/json")
        .json(request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PitchError::Status {
            status: status.as_u16(),
            message: error_message_from_body(&body),
        });
    }

    if response.content_length() == Some(0) {
        return Err(PitchError::EmptyBody);
    }

    Ok(response)
}

/// Extract the user-facing message from an error response body.
///
/// Accepts `{"error": "..."}`, `{"message": "..."}`, `{"error": {"message":
/// "..."}}` or a short plain-text body; anything else maps to
/// [`GENERIC_FAILURE`].
pub fn error_message_from_body(body: &str) -> String {
    let body = body.trim();

    if let Ok(value) = serde_json::from_str::<Value>(body) {
        let message = value
            .get("error")
            .and_then(|e| e.as_str().or_else(|| e.get("message").and_then(Value::as_str)))
            .or_else(|| value.get("message").and_then(Value::as_str))
            .filter(|m| !m.trim().is_empty());

        return message.unwrap_or(GENERIC_FAILURE).to_string();
    }

    if body.is_empty() || body.starts_with('<') {
        GENERIC_FAILURE.to_string()
    } else {
        body.to_string()
    }
}

/// Read a response body to the end, forwarding fragments to `tx`.
///
/// Sends [`PitchEvent::Done`] when the body ends or a `[DONE]` line arrives.
/// Returns early without `Done` when `cancel` fires or the receiver is gone.
/// Malformed lines are logged and skipped.
pub async fn pump_fragments<S, B, E>(
    body: S,
    tx: &mpsc::Sender<PitchEvent>,
    cancel: &CancellationToken,
) -> Result<(), PitchError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
{
    let mut body = std::pin::pin!(body);
    let mut decoder = FragmentDecoder::new();
    let mut fragments = 0usize;

    loop {
        let next = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                debug!(fragments, "pitch stream cancelled");
                return Ok(());
            }
            next = body.next() => next,
        };

        let Some(chunk) = next else {
            break;
        };
        let chunk = chunk.map_err(|e| PitchError::Stream(e.to_string()))?;

        for outcome in decoder.feed(chunk.as_ref()) {
            match forward(outcome, tx, cancel, &mut fragments).await {
                Flow::Continue => {}
                Flow::Finished => return finish(tx, fragments).await,
                Flow::Abandoned => return Ok(()),
            }
        }
    }

    for outcome in decoder.finish() {
        match forward(outcome, tx, cancel, &mut fragments).await {
            Flow::Continue => {}
            Flow::Finished => break,
            Flow::Abandoned => return Ok(()),
        }
    }

    finish(tx, fragments).await
}

enum Flow {
    Continue,
    /// The server sent an explicit end marker.
    Finished,
    /// Cancelled, or nobody is listening any more.
    Abandoned,
}

async fn forward(
    outcome: LineOutcome,
    tx: &mpsc::Sender<PitchEvent>,
    cancel: &CancellationToken,
    fragments: &mut usize,
) -> Flow {
    if cancel.is_cancelled() {
        return Flow::Abandoned;
    }

    match outcome {
        LineOutcome::Ignored => Flow::Continue,
        LineOutcome::Fragment(content) if content.is_empty() => Flow::Continue,
        LineOutcome::Fragment(content) => {
            *fragments += 1;
            if tx.send(PitchEvent::Fragment(content)).await.is_err() {
                Flow::Abandoned
            } else {
                Flow::Continue
            }
        }
        LineOutcome::Done => Flow::Finished,
        LineOutcome::Malformed { payload, reason } => {
            warn!(%reason, %payload, "skipping malformed pitch fragment");
            Flow::Continue
        }
    }
}

async fn finish(tx: &mpsc::Sender<PitchEvent>, fragments: usize) -> Result<(), PitchError> {
    debug!(fragments, "pitch stream complete");
    let _ = tx.send(PitchEvent::Done).await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_error_field() {
        assert_eq!(
            error_message_from_body(r#"{"error":"Rate limit exceeded"}"#),
            "Rate limit exceeded"
        );
    }

    #[test]
    fn test_error_message_from_message_field() {
        assert_eq!(
            error_message_from_body(r#"{"message":"Problem too long"}"#),
            "Problem too long"
        );
    }

    #[test]
    fn test_error_message_from_nested_error() {
        assert_eq!(
            error_message_from_body(r#"{"error":{"message":"Upstream overloaded"}}"#),
            "Upstream overloaded"
        );
    }

    #[test]
    fn test_error_message_kept_verbatim() {
        assert_eq!(
            error_message_from_body(r#"{"error":"  Rate limited  "}"#),
            "  Rate limited  "
        );
        assert_eq!(error_message_from_body(r#"{"message":"   "}"#), GENERIC_FAILURE);
    }

    #[test]
    fn test_error_message_fallbacks() {
        assert_eq!(error_message_from_body(""), GENERIC_FAILURE);
        assert_eq!(error_message_from_body(r#"{"error":""}"#), GENERIC_FAILURE);
        assert_eq!(error_message_from_body(r#"{"status":500}"#), GENERIC_FAILURE);
        assert_eq!(error_message_from_body("<html>502</html>"), GENERIC_FAILURE);
        assert_eq!(error_message_from_body("Service down"), "Service down");
    }

    #[test]
    fn test_http_client_uses_configured_endpoint() {
        let config = PitchConfig {
            endpoint: "http://127.0.0.1:9/api/pitch".to_string(),
            connect_timeout_secs: 2,
        };
        let client = HttpPitchClient::new(&config);
        assert_eq!(client.endpoint(), "http://127.0.0.1:9/api/pitch");
        assert_eq!(client.describe(), "http://127.0.0.1:9/api/pitch");
    }
}
