//! Lifecycle tracking and refresh scheduling driven through a scripted
//! gateway on virtual time. Every test pauses the clock, so poll and
//! refresh ticks fire deterministically.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use aegis_console::errors::ConsoleError;
use aegis_console::events::ConsoleEvent;
use aegis_console::gateway::Gateway;
use aegis_console::models::{RiskLevel, RunStatus, RunStatusReport, SummaryDocument};
use aegis_console::scheduler::RefreshScheduler;
use aegis_console::tracker::{LifecycleTracker, RunPhase, TrackerOptions};

struct MockGateway {
    start_results: Mutex<VecDeque<Result<String, ConsoleError>>>,
    poll_results: Mutex<VecDeque<Result<RunStatusReport, ConsoleError>>>,
    summary_results: Mutex<VecDeque<Result<SummaryDocument, ConsoleError>>>,
    poll_count: AtomicU32,
    summary_count: AtomicU32,
}

impl MockGateway {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            start_results: Mutex::new(VecDeque::new()),
            poll_results: Mutex::new(VecDeque::new()),
            summary_results: Mutex::new(VecDeque::new()),
            poll_count: AtomicU32::new(0),
            summary_count: AtomicU32::new(0),
        })
    }

    async fn push_start(&self, result: Result<String, ConsoleError>) {
        self.start_results.lock().await.push_back(result);
    }

    async fn push_poll(&self, result: Result<RunStatusReport, ConsoleError>) {
        self.poll_results.lock().await.push_back(result);
    }

    async fn push_summary(&self, result: Result<SummaryDocument, ConsoleError>) {
        self.summary_results.lock().await.push_back(result);
    }

    fn polls(&self) -> u32 {
        self.poll_count.load(Ordering::SeqCst)
    }

    fn summaries(&self) -> u32 {
        self.summary_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Gateway for MockGateway {
    async fn fetch_summary(&self) -> Result<SummaryDocument, ConsoleError> {
        self.summary_count.fetch_add(1, Ordering::SeqCst);
        match self.summary_results.lock().await.pop_front() {
            Some(result) => result,
            None => Ok(base_summary()),
        }
    }

    async fn fetch_module_detail(&self, _module: &str) -> Result<Value, ConsoleError> {
        Ok(Value::Null)
    }

    async fn start_assessment(&self) -> Result<String, ConsoleError> {
        match self.start_results.lock().await.pop_front() {
            Some(result) => result,
            None => Err(ConsoleError::Internal("unexpected start_assessment call".into())),
        }
    }

    async fn poll_assessment(&self, _run_id: &str) -> Result<RunStatusReport, ConsoleError> {
        self.poll_count.fetch_add(1, Ordering::SeqCst);
        match self.poll_results.lock().await.pop_front() {
            Some(result) => result,
            // Default: the run is still going
            None => Ok(running()),
        }
    }
}

fn base_summary() -> SummaryDocument {
    SummaryDocument {
        risk_score: 42.0,
        risk_level: RiskLevel::Medium,
        module_results: HashMap::new(),
        recommendations: vec![],
        threat_data: None,
    }
}

fn running() -> RunStatusReport {
    RunStatusReport {
        status: RunStatus::Running,
        error: None,
    }
}

fn completed() -> RunStatusReport {
    RunStatusReport {
        status: RunStatus::Completed,
        error: None,
    }
}

fn failed(reason: Option<&str>) -> RunStatusReport {
    RunStatusReport {
        status: RunStatus::Failed,
        error: reason.map(str::to_string),
    }
}

fn net_err() -> ConsoleError {
    ConsoleError::Network("connection refused".into())
}

fn tracker_with(
    gateway: &Arc<MockGateway>,
    options: TrackerOptions,
) -> (LifecycleTracker, UnboundedReceiver<ConsoleEvent>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let tracker = LifecycleTracker::new(Arc::clone(gateway) as Arc<dyn Gateway>, tx, options);
    (tracker, rx)
}

fn drain(rx: &mut UnboundedReceiver<ConsoleEvent>) -> Vec<ConsoleEvent> {
    let mut events = Vec::new();
    while let Ok(event) = rx.try_recv() {
        events.push(event);
    }
    events
}

fn count(events: &[ConsoleEvent], pred: impl Fn(&ConsoleEvent) -> bool) -> usize {
    events.iter().filter(|e| pred(e)).count()
}

#[tokio::test(start_paused = true)]
async fn run_completes_after_three_polls_with_exactly_one_release() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("abc123".into())).await;
    gateway.push_poll(Ok(running())).await;
    gateway.push_poll(Ok(running())).await;
    gateway.push_poll(Ok(completed())).await;

    let (tracker, mut rx) = tracker_with(&gateway, TrackerOptions::default());
    let run_id = tracker.start().await.unwrap();
    assert_eq!(run_id, "abc123");
    assert_eq!(tracker.phase().await, RunPhase::Polling);

    // Polls land at t=5s, 10s, 15s
    sleep(Duration::from_secs(16)).await;
    let events = drain(&mut rx);

    assert_eq!(gateway.polls(), 3);
    assert_eq!(
        count(&events, |e| matches!(e, ConsoleEvent::RunStarted { run_id } if run_id == "abc123")),
        1
    );
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::ControlReleased)), 1);
    assert_eq!(
        count(&events, |e| matches!(e, ConsoleEvent::RunCompleted { run_id } if run_id == "abc123")),
        1
    );
    // Completion triggers exactly one summary refetch
    assert_eq!(gateway.summaries(), 1);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::SummaryFetched(_))), 1);

    // No poll fires after the terminal transition
    sleep(Duration::from_secs(60)).await;
    assert_eq!(gateway.polls(), 3);
    assert_eq!(tracker.phase().await, RunPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn create_run_failure_releases_control_and_never_polls() {
    let gateway = MockGateway::new();
    gateway.push_start(Err(net_err())).await;

    let (tracker, mut rx) = tracker_with(&gateway, TrackerOptions::default());
    let err = tracker.start().await.unwrap_err();
    assert!(matches!(err, ConsoleError::Network(_)));

    let events = drain(&mut rx);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::ControlLocked)), 1);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::StartFailed { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::ControlReleased)), 1);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::RunStarted { .. })), 0);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(gateway.polls(), 0);
    assert_eq!(tracker.phase().await, RunPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn second_start_is_rejected_and_creates_no_second_timer() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("run-1".into())).await;

    let (tracker, mut rx) = tracker_with(&gateway, TrackerOptions::default());
    tracker.start().await.unwrap();

    let err = tracker.start().await.unwrap_err();
    assert!(matches!(err, ConsoleError::RunInFlight(_)));

    // One timer only: polls at t=5s and t=10s, nothing doubled
    sleep(Duration::from_secs(12)).await;
    assert_eq!(gateway.polls(), 2);

    let events = drain(&mut rx);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::RunStarted { .. })), 1);
}

#[tokio::test(start_paused = true)]
async fn transport_error_on_one_poll_does_not_stop_tracking() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("run-2".into())).await;
    gateway.push_poll(Ok(running())).await;
    gateway.push_poll(Err(net_err())).await;
    gateway.push_poll(Ok(completed())).await;

    let (tracker, mut rx) = tracker_with(&gateway, TrackerOptions::default());
    tracker.start().await.unwrap();

    sleep(Duration::from_secs(16)).await;
    let events = drain(&mut rx);

    // The failed poll neither transitioned the machine nor stopped the
    // timer: the third scheduled poll still fired and completed the run.
    assert_eq!(gateway.polls(), 3);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::PollTransportError { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::RunCompleted { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::ControlReleased)), 1);
}

#[tokio::test(start_paused = true)]
async fn consecutive_transport_errors_hit_ceiling_and_fail_run() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("run-3".into())).await;
    for _ in 0..3 {
        gateway.push_poll(Err(net_err())).await;
    }

    let options = TrackerOptions {
        max_consecutive_poll_errors: 3,
        ..TrackerOptions::default()
    };
    let (tracker, mut rx) = tracker_with(&gateway, options);
    tracker.start().await.unwrap();

    sleep(Duration::from_secs(16)).await;
    let events = drain(&mut rx);

    assert_eq!(gateway.polls(), 3);
    let failed = events
        .iter()
        .find_map(|e| match e {
            ConsoleEvent::RunFailed { error, .. } => Some(error.clone()),
            _ => None,
        })
        .expect("run should have failed");
    assert!(failed.contains("unreachable"));
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::ControlReleased)), 1);

    // Timer is gone
    sleep(Duration::from_secs(60)).await;
    assert_eq!(gateway.polls(), 3);
}

#[tokio::test(start_paused = true)]
async fn successful_poll_resets_consecutive_error_count() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("run-4".into())).await;
    gateway.push_poll(Err(net_err())).await;
    gateway.push_poll(Err(net_err())).await;
    gateway.push_poll(Ok(running())).await;
    gateway.push_poll(Err(net_err())).await;
    gateway.push_poll(Err(net_err())).await;
    gateway.push_poll(Ok(completed())).await;

    let options = TrackerOptions {
        max_consecutive_poll_errors: 3,
        ..TrackerOptions::default()
    };
    let (tracker, mut rx) = tracker_with(&gateway, options);
    tracker.start().await.unwrap();

    sleep(Duration::from_secs(31)).await;
    let events = drain(&mut rx);

    // Errors never reached three in a row, so the run completed normally.
    assert_eq!(gateway.polls(), 6);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::RunCompleted { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::RunFailed { .. })), 0);
}

#[tokio::test(start_paused = true)]
async fn failed_run_surfaces_reported_reason() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("run-5".into())).await;
    gateway.push_poll(Ok(failed(Some("disk full")))).await;

    let (tracker, mut rx) = tracker_with(&gateway, TrackerOptions::default());
    tracker.start().await.unwrap();

    sleep(Duration::from_secs(6)).await;
    let events = drain(&mut rx);

    let error = events
        .iter()
        .find_map(|e| match e {
            ConsoleEvent::RunFailed { error, .. } => Some(error.clone()),
            _ => None,
        })
        .expect("run should have failed");
    assert!(error.contains("disk full"));
    // No summary refetch on failure
    assert_eq!(gateway.summaries(), 0);
}

#[tokio::test(start_paused = true)]
async fn unrecognized_status_fails_run_on_first_poll() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("run-10".into())).await;
    gateway
        .push_poll(Ok(RunStatusReport {
            status: RunStatus::Unknown,
            error: None,
        }))
        .await;

    let (tracker, mut rx) = tracker_with(&gateway, TrackerOptions::default());
    tracker.start().await.unwrap();

    sleep(Duration::from_secs(6)).await;
    let events = drain(&mut rx);

    // Terminal on the first poll; the tracker never retries an outcome it
    // cannot interpret.
    assert_eq!(gateway.polls(), 1);
    let error = events
        .iter()
        .find_map(|e| match e {
            ConsoleEvent::RunFailed { error, .. } => Some(error.clone()),
            _ => None,
        })
        .expect("run should have failed");
    assert!(error.contains("unrecognized status"));
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::ControlReleased)), 1);

    sleep(Duration::from_secs(60)).await;
    assert_eq!(gateway.polls(), 1);
    assert_eq!(tracker.phase().await, RunPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn failed_run_without_reason_gets_generic_message() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("run-6".into())).await;
    gateway.push_poll(Ok(failed(None))).await;

    let (tracker, mut rx) = tracker_with(&gateway, TrackerOptions::default());
    tracker.start().await.unwrap();

    sleep(Duration::from_secs(6)).await;
    let events = drain(&mut rx);

    let error = events
        .iter()
        .find_map(|e| match e {
            ConsoleEvent::RunFailed { error, .. } => Some(error.clone()),
            _ => None,
        })
        .expect("run should have failed");
    assert!(error.contains("without a reported reason"));
}

#[tokio::test(start_paused = true)]
async fn wall_clock_ceiling_fails_stuck_run() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("run-7".into())).await;
    // Every poll reports running; the run never terminates on its own.

    let options = TrackerOptions {
        poll_timeout: Duration::from_secs(12),
        ..TrackerOptions::default()
    };
    let (tracker, mut rx) = tracker_with(&gateway, options);
    tracker.start().await.unwrap();

    sleep(Duration::from_secs(16)).await;
    let events = drain(&mut rx);

    // Ticks at 5s and 10s polled; the 15s tick tripped the ceiling first.
    assert_eq!(gateway.polls(), 2);
    let error = events
        .iter()
        .find_map(|e| match e {
            ConsoleEvent::RunFailed { error, .. } => Some(error.clone()),
            _ => None,
        })
        .expect("run should have timed out");
    assert!(error.contains("did not reach a terminal status"));
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::ControlReleased)), 1);
    assert_eq!(tracker.phase().await, RunPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn post_completion_refetch_failure_is_reported() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("run-8".into())).await;
    gateway.push_poll(Ok(completed())).await;
    gateway.push_summary(Err(net_err())).await;

    let (tracker, mut rx) = tracker_with(&gateway, TrackerOptions::default());
    tracker.start().await.unwrap();

    sleep(Duration::from_secs(6)).await;
    let events = drain(&mut rx);

    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::RunCompleted { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::RefreshFailed { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::SummaryFetched(_))), 0);
}

#[tokio::test(start_paused = true)]
async fn client_cancellation_stops_polling_and_releases_once() {
    let gateway = MockGateway::new();
    gateway.push_start(Ok("run-9".into())).await;

    let (tracker, mut rx) = tracker_with(&gateway, TrackerOptions::default());
    tracker.start().await.unwrap();

    sleep(Duration::from_secs(7)).await;
    assert_eq!(gateway.polls(), 1);

    tracker.cancel_tracking().await;
    sleep(Duration::from_secs(60)).await;

    assert_eq!(gateway.polls(), 1);
    assert_eq!(tracker.phase().await, RunPhase::Idle);
    let events = drain(&mut rx);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::ControlReleased)), 1);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::RunFailed { .. })), 0);
}

#[tokio::test(start_paused = true)]
async fn refresh_scheduler_survives_failed_cycles() {
    let gateway = MockGateway::new();
    gateway.push_summary(Ok(base_summary())).await;
    gateway.push_summary(Err(net_err())).await;
    gateway.push_summary(Ok(base_summary())).await;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let cancel = CancellationToken::new();
    let scheduler = RefreshScheduler::new(
        Arc::clone(&gateway) as Arc<dyn Gateway>,
        tx,
        Duration::from_secs(60),
    );
    let handle = scheduler.spawn(cancel.clone());

    // First fetch fires immediately
    sleep(Duration::from_secs(1)).await;
    assert_eq!(gateway.summaries(), 1);

    // Second cycle fails, third succeeds anyway
    sleep(Duration::from_secs(120)).await;
    assert_eq!(gateway.summaries(), 3);

    let events = drain(&mut rx);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::SummaryFetched(_))), 2);
    assert_eq!(count(&events, |e| matches!(e, ConsoleEvent::RefreshFailed { .. })), 1);

    cancel.cancel();
    let _ = handle.await;
    sleep(Duration::from_secs(180)).await;
    assert_eq!(gateway.summaries(), 3);
}
