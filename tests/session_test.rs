//! Pitch session state machine, driven through a scripted backend.

use std::sync::{Arc, Mutex};

use folio_cli::markdown::Block;
use folio_cli::pitch::{
    PitchBackend, PitchError, PitchEvent, PitchPhase, PitchRequest, PitchSession, SingleFlight,
    SubmitOutcome,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Backend that hands the test the sending side of every request.
#[derive(Default)]
struct ScriptedBackend {
    requests: Mutex<Vec<PitchRequest>>,
    streams: Mutex<Vec<(mpsc::Sender<PitchEvent>, CancellationToken)>>,
}

impl ScriptedBackend {
    fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    fn sender(&self, index: usize) -> mpsc::Sender<PitchEvent> {
        self.streams.lock().unwrap()[index].0.clone()
    }

    fn token(&self, index: usize) -> CancellationToken {
        self.streams.lock().unwrap()[index].1.clone()
    }

    /// Drop the backend's own copies of the senders.
    fn release(&self) {
        self.streams.lock().unwrap().clear();
    }
}

impl PitchBackend for ScriptedBackend {
    fn stream_pitch(
        &self,
        request: PitchRequest,
        cancel: CancellationToken,
    ) -> mpsc::Receiver<PitchEvent> {
        let (tx, rx) = mpsc::channel(16);
        self.requests.lock().unwrap().push(request);
        self.streams.lock().unwrap().push((tx, cancel));
        rx
    }

    fn describe(&self) -> String {
        "scripted".to_string()
    }
}

fn session(policy: SingleFlight) -> (Arc<ScriptedBackend>, PitchSession) {
    let backend = Arc::new(ScriptedBackend::default());
    let session = PitchSession::new(backend.clone(), policy);
    (backend, session)
}

#[test]
fn test_blank_submission_never_reaches_backend() {
    let (backend, mut session) = session(SingleFlight::Reject);

    assert_eq!(session.submit(""), SubmitOutcome::Ignored);
    assert_eq!(session.submit("   \t\n"), SubmitOutcome::Ignored);
    assert_eq!(backend.calls(), 0);
    assert_eq!(session.phase(), &PitchPhase::Idle);
    assert!(session.error().is_none());
}

#[test]
fn test_submission_sends_problem_verbatim() {
    let (backend, mut session) = session(SingleFlight::Reject);

    assert_eq!(session.submit("  Invoices pile up  "), SubmitOutcome::Started);
    assert_eq!(backend.calls(), 1);
    assert_eq!(
        backend.requests.lock().unwrap()[0].business_problem,
        "  Invoices pile up  "
    );
    assert_eq!(session.phase(), &PitchPhase::Requesting);
    assert!(session.is_in_flight());
    assert!(!session.can_submit());
}

#[test]
fn test_fragments_accumulate_and_complete() {
    let (backend, mut session) = session(SingleFlight::Reject);
    session.submit("Slow onboarding");

    let tx = backend.sender(0);
    tx.try_send(PitchEvent::Streaming).unwrap();
    tx.try_send(PitchEvent::Fragment("# Onboard".into())).unwrap();
    tx.try_send(PitchEvent::Fragment("ly\n- **fast** setup".into())).unwrap();
    assert!(session.process_events());
    assert_eq!(session.phase(), &PitchPhase::Streaming);
    assert_eq!(session.accumulated(), "# Onboardly\n- **fast** setup");

    tx.try_send(PitchEvent::Done).unwrap();
    assert!(session.process_events());
    assert_eq!(session.phase(), &PitchPhase::Completed);
    assert!(session.completed_at().is_some());
    assert!(!session.is_in_flight());

    let document = session.document();
    assert_eq!(document.len(), 2);
    assert!(matches!(document[0], Block::Title(_)));
    assert!(matches!(document[1], Block::List(_)));
}

#[test]
fn test_process_events_without_news_reports_no_change() {
    let (_backend, mut session) = session(SingleFlight::Reject);
    assert!(!session.process_events());

    session.submit("Anything");
    assert!(!session.process_events());
}

#[test]
fn test_second_submit_rejected_while_in_flight() {
    let (backend, mut session) = session(SingleFlight::Reject);
    session.submit("First");

    assert_eq!(session.submit("Second"), SubmitOutcome::Busy);
    assert_eq!(backend.calls(), 1);
    assert!(!backend.token(0).is_cancelled());
}

#[test]
fn test_second_submit_restarts_when_configured() {
    let (backend, mut session) = session(SingleFlight::Restart);
    session.submit("First");
    backend
        .sender(0)
        .try_send(PitchEvent::Fragment("old text".into()))
        .unwrap();
    session.process_events();

    assert!(session.can_submit());
    assert_eq!(session.submit("Second"), SubmitOutcome::Restarted);
    assert_eq!(backend.calls(), 2);
    assert!(backend.token(0).is_cancelled());
    assert!(!backend.token(1).is_cancelled());
    assert_eq!(session.accumulated(), "");
    assert_eq!(session.generation(), 2);

    // Late events from the first request cannot reach the new one
    let _ = backend.sender(0).try_send(PitchEvent::Fragment("stale".into()));
    backend
        .sender(1)
        .try_send(PitchEvent::Fragment("new".into()))
        .unwrap();
    session.process_events();
    assert_eq!(session.accumulated(), "new");
}

#[test]
fn test_error_event_fails_cycle_and_is_dismissable() {
    let (backend, mut session) = session(SingleFlight::Reject);
    session.submit("Problem");

    let error = PitchError::Status {
        status: 429,
        message: "Rate limit exceeded".into(),
    };
    backend
        .sender(0)
        .try_send(PitchEvent::Error(error.clone()))
        .unwrap();
    session.process_events();

    assert_eq!(session.phase(), &PitchPhase::Failed(error.clone()));
    assert_eq!(session.error(), Some(&error));
    assert_eq!(error.to_string(), "Rate limit exceeded");
    assert!(session.can_submit());

    assert!(session.dismiss_error());
    assert_eq!(session.phase(), &PitchPhase::Idle);
    assert!(session.error().is_none());
    assert!(!session.dismiss_error());
}

#[test]
fn test_error_keeps_text_received_so_far() {
    let (backend, mut session) = session(SingleFlight::Reject);
    session.submit("Problem");

    let tx = backend.sender(0);
    tx.try_send(PitchEvent::Fragment("Half a pitch".into())).unwrap();
    tx.try_send(PitchEvent::Error(PitchError::Stream("reset".into())))
        .unwrap();
    session.process_events();

    assert_eq!(session.accumulated(), "Half a pitch");
    assert!(session.error().is_some());
}

#[test]
fn test_vanished_stream_becomes_error() {
    let (backend, mut session) = session(SingleFlight::Reject);
    session.submit("Problem");
    backend.release();

    assert!(session.process_events());
    assert!(matches!(
        session.phase(),
        PitchPhase::Failed(PitchError::Stream(_))
    ));
    assert!(!session.is_in_flight());
}

#[test]
fn test_cancel_keeps_partial_text_and_fires_token() {
    let (backend, mut session) = session(SingleFlight::Reject);
    session.submit("Problem");
    backend
        .sender(0)
        .try_send(PitchEvent::Fragment("Partial".into()))
        .unwrap();
    session.process_events();

    assert!(session.cancel());
    assert!(backend.token(0).is_cancelled());
    assert_eq!(session.phase(), &PitchPhase::Idle);
    assert_eq!(session.accumulated(), "Partial");
    assert!(!session.cancel());
}

#[test]
fn test_new_submission_clears_previous_pitch() {
    let (backend, mut session) = session(SingleFlight::Reject);
    session.submit("First");
    let tx = backend.sender(0);
    tx.try_send(PitchEvent::Fragment("First pitch".into())).unwrap();
    tx.try_send(PitchEvent::Done).unwrap();
    session.process_events();

    assert_eq!(session.submit("Second"), SubmitOutcome::Started);
    assert_eq!(session.accumulated(), "");
    assert!(session.completed_at().is_none());
}

#[test]
fn test_dropping_session_cancels_request() {
    let (backend, mut session) = session(SingleFlight::Reject);
    session.submit("Problem");
    let token = backend.token(0);

    drop(session);
    assert!(token.is_cancelled());
}

#[test]
fn test_backend_name_comes_from_backend() {
    let (_backend, session) = session(SingleFlight::Restart);
    assert_eq!(session.backend_name(), "scripted");
    assert_eq!(session.policy(), SingleFlight::Restart);
}
