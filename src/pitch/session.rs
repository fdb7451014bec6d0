//! Generation state for the pitch view.
//!
//! The session owns the accumulated pitch text and the receiver for the one
//! request that may be in flight. It is polled from the UI loop, the same way
//! chat streams are drained without blocking.

use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::{PitchBackend, PitchError, PitchEvent, PitchRequest};
use crate::markdown::{self, Block};

/// What to do when a pitch is submitted while another is still streaming.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SingleFlight {
    /// Refuse the new submission.
    #[default]
    Reject,
    /// Cancel the running stream and start over.
    Restart,
}

/// Where the current generation cycle is.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PitchPhase {
    /// Nothing running. Also entered after a cancel or a dismissed error.
    #[default]
    Idle,
    /// Request sent, waiting for the response headers.
    Requesting,
    /// Body is being read.
    Streaming,
    /// The stream ended normally.
    Completed,
    /// The cycle ended with an error.
    Failed(PitchError),
}

/// Result of [`PitchSession::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// A new request was started.
    Started,
    /// The previous request was cancelled and a new one started.
    Restarted,
    /// Another request is in flight and the policy is to reject.
    Busy,
    /// Input was empty; nothing was sent.
    Ignored,
}

/// Connection to the in-flight request.
struct InFlight {
    rx: mpsc::Receiver<PitchEvent>,
    cancel: CancellationToken,
}

/// Pitch generation state for one UI session.
pub struct PitchSession {
    backend: Arc<dyn PitchBackend>,
    policy: SingleFlight,
    phase: PitchPhase,
    accumulated: String,
    in_flight: Option<InFlight>,
    generation: u64,
    completed_at: Option<DateTime<Local>>,
}

impl PitchSession {
    pub fn new(backend: Arc<dyn PitchBackend>, policy: SingleFlight) -> Self {
        Self {
            backend,
            policy,
            phase: PitchPhase::Idle,
            accumulated: String::new(),
            in_flight: None,
            generation: 0,
            completed_at: None,
        }
    }

    /// Submit a business problem for pitching.
    pub fn submit(&mut self, problem: &str) -> SubmitOutcome {
        let request = match PitchRequest::new(problem) {
            Ok(request) => request,
            Err(_) => {
                debug!("ignoring empty pitch submission");
                return SubmitOutcome::Ignored;
            }
        };

        let restarted = if self.is_in_flight() {
            match self.policy {
                SingleFlight::Reject => {
                    debug!(generation = self.generation, "pitch already in flight, rejecting");
                    return SubmitOutcome::Busy;
                }
                SingleFlight::Restart => {
                    self.cancel();
                    true
                }
            }
        } else {
            false
        };

        self.start(request);

        if restarted {
            SubmitOutcome::Restarted
        } else {
            SubmitOutcome::Started
        }
    }

    fn start(&mut self, request: PitchRequest) {
        self.generation += 1;
        self.accumulated.clear();
        self.completed_at = None;

        let cancel = CancellationToken::new();
        let rx = self.backend.stream_pitch(request, cancel.clone());
        self.in_flight = Some(InFlight { rx, cancel });
        self.phase = PitchPhase::Requesting;

        info!(generation = self.generation, "pitch generation started");
    }

    /// Drain every event that has arrived since the last call.
    ///
    /// Returns true if anything changed. Call this once per frame.
    pub fn process_events(&mut self) -> bool {
        let mut changed = false;

        while let Some(in_flight) = &mut self.in_flight {
            match in_flight.rx.try_recv() {
                Ok(event) => {
                    changed = true;
                    self.apply(event);
                }
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    changed = true;
                    warn!(generation = self.generation, "pitch stream closed without finishing");
                    self.in_flight = None;
                    self.phase = PitchPhase::Failed(PitchError::Stream(
                        "the connection closed unexpectedly".to_string(),
                    ));
                }
            }
        }

        changed
    }

    fn apply(&mut self, event: PitchEvent) {
        match event {
            PitchEvent::Streaming => {
                self.phase = PitchPhase::Streaming;
            }
            PitchEvent::Fragment(content) => {
                self.accumulated.push_str(&content);
                self.phase = PitchPhase::Streaming;
            }
            PitchEvent::Done => {
                info!(
                    generation = self.generation,
                    chars = self.accumulated.len(),
                    "pitch generation completed"
                );
                self.in_flight = None;
                self.phase = PitchPhase::Completed;
                self.completed_at = Some(Local::now());
            }
            PitchEvent::Error(e) => {
                warn!(generation = self.generation, error = %e, "pitch generation failed");
                self.in_flight = None;
                self.phase = PitchPhase::Failed(e);
            }
        }
    }

    /// Stop the in-flight request, keeping whatever text already arrived.
    ///
    /// Returns false if nothing was running.
    pub fn cancel(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.cancel.cancel();
                self.phase = PitchPhase::Idle;
                info!(generation = self.generation, "pitch generation cancelled");
                true
            }
            None => false,
        }
    }

    /// Clear a displayed error.
    pub fn dismiss_error(&mut self) -> bool {
        if matches!(self.phase, PitchPhase::Failed(_)) {
            self.phase = PitchPhase::Idle;
            true
        } else {
            false
        }
    }

    /// Whether a request is being sent or streamed.
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Whether the submit control should accept input.
    pub fn can_submit(&self) -> bool {
        !self.is_in_flight() || self.policy == SingleFlight::Restart
    }

    pub fn phase(&self) -> &PitchPhase {
        &self.phase
    }

    /// The error to show, if the last cycle failed visibly.
    pub fn error(&self) -> Option<&PitchError> {
        match &self.phase {
            PitchPhase::Failed(e) if e.is_user_visible() => Some(e),
            _ => None,
        }
    }

    /// Text received so far for the current request.
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    /// Parse the accumulated text into blocks.
    pub fn document(&self) -> Vec<Block> {
        markdown::parse(&self.accumulated)
    }

    /// Number of requests started in this session.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }

    pub fn policy(&self) -> SingleFlight {
        self.policy
    }

    pub fn backend_name(&self) -> String {
        self.backend.describe()
    }
}

impl Drop for PitchSession {
    fn drop(&mut self) {
        if let Some(in_flight) = self.in_flight.take() {
            in_flight.cancel.cancel();
        }
    }
}
