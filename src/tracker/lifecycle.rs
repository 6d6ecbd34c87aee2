use std::sync::Arc;

use tokio::sync::{mpsc::UnboundedSender, Mutex};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{InFlight, RunOutcome, RunPhase, TrackerOptions};
use crate::errors::ConsoleError;
use crate::events::ConsoleEvent;
use crate::gateway::Gateway;
use crate::models::{AssessmentRun, RunStatus};

/// Orchestrates the assessment lifecycle: start a remote run, poll it to a
/// terminal status, then trigger a summary refetch. Owns the single
/// mutable piece of session state (whether a run is in flight) and the one
/// poll timer.
///
/// Guarantees, on every exit path:
/// - the poll timer never outlives the run's terminal transition;
/// - `ControlReleased` is emitted exactly once per run;
/// - a transient poll failure never stops tracking by itself.
pub struct LifecycleTracker {
    gateway: Arc<dyn Gateway>,
    events: UnboundedSender<ConsoleEvent>,
    options: TrackerOptions,
    in_flight: Arc<Mutex<Option<InFlight>>>,
}

impl LifecycleTracker {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        events: UnboundedSender<ConsoleEvent>,
        options: TrackerOptions,
    ) -> Self {
        Self {
            gateway,
            events,
            options,
            in_flight: Arc::new(Mutex::new(None)),
        }
    }

    pub async fn phase(&self) -> RunPhase {
        match self.in_flight.lock().await.as_ref() {
            None => RunPhase::Idle,
            Some(InFlight::Starting) => RunPhase::Starting,
            Some(InFlight::Polling { .. }) => RunPhase::Polling,
        }
    }

    /// Start a new assessment run. Rejects re-entrant calls while a run is
    /// tracked: the slot is reserved before the create-run request goes out,
    /// so a second caller racing past a disabled control still gets
    /// `RunInFlight`. On create failure the slot is cleared and the control
    /// released; no poll timer is ever created on that path.
    pub async fn start(&self) -> Result<String, ConsoleError> {
        {
            let mut slot = self.in_flight.lock().await;
            if slot.is_some() {
                return Err(ConsoleError::RunInFlight(
                    "an assessment is already being tracked".into(),
                ));
            }
            *slot = Some(InFlight::Starting);
        }
        let _ = self.events.send(ConsoleEvent::ControlLocked);

        match self.gateway.start_assessment().await {
            Ok(run_id) => {
                info!(run_id = %run_id, "assessment started, polling begins");
                let cancel = CancellationToken::new();
                {
                    let mut slot = self.in_flight.lock().await;
                    if !matches!(slot.as_ref(), Some(InFlight::Starting)) {
                        // Cancelled while the create request was in flight;
                        // the control was already released, so the run is
                        // abandoned without ever scheduling a poll.
                        debug!(run_id = %run_id, "start superseded by cancellation");
                        return Ok(run_id);
                    }
                    *slot = Some(InFlight::Polling {
                        run_id: run_id.clone(),
                        cancel: cancel.clone(),
                    });
                }
                let _ = self.events.send(ConsoleEvent::RunStarted {
                    run_id: run_id.clone(),
                });
                self.spawn_poll_task(run_id.clone(), cancel);
                Ok(run_id)
            }
            Err(e) => {
                warn!(error = %e, "failed to start assessment");
                self.in_flight.lock().await.take();
                let _ = self.events.send(ConsoleEvent::StartFailed {
                    error: e.to_string(),
                });
                let _ = self.events.send(ConsoleEvent::ControlReleased);
                Err(e)
            }
        }
    }

    /// Client-side cancellation (session shutdown). Stops the poll task
    /// without terminal side effects; the control is released here since
    /// the poll task will no longer do it.
    pub async fn cancel_tracking(&self) {
        let taken = self.in_flight.lock().await.take();
        match taken {
            Some(InFlight::Polling { run_id, cancel }) => {
                cancel.cancel();
                debug!(run_id = %run_id, "tracking cancelled by client");
                let _ = self.events.send(ConsoleEvent::ControlReleased);
            }
            Some(InFlight::Starting) => {
                // No timer exists yet; the in-progress start() sees the
                // empty slot and abandons the run.
                let _ = self.events.send(ConsoleEvent::ControlReleased);
            }
            None => {}
        }
    }

    fn spawn_poll_task(&self, run_id: String, cancel: CancellationToken) {
        let gateway = Arc::clone(&self.gateway);
        let events = self.events.clone();
        let in_flight = Arc::clone(&self.in_flight);
        let opts = self.options.clone();

        tokio::spawn(async move {
            let mut run = AssessmentRun::new(&run_id);
            let started = tokio::time::Instant::now();
            let mut consecutive_errors: u32 = 0;

            let mut ticker = tokio::time::interval(opts.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // interval yields immediately on the first tick; consume it so
            // the first poll lands one full interval after the start.
            ticker.tick().await;

            let outcome = loop {
                tokio::select! {
                    _ = cancel.cancelled() => return,
                    _ = ticker.tick() => {}
                }

                if !opts.poll_timeout.is_zero() && started.elapsed() >= opts.poll_timeout {
                    break RunOutcome::Failed(format!(
                        "assessment {run_id} did not reach a terminal status within {}s",
                        opts.poll_timeout.as_secs()
                    ));
                }

                match gateway.poll_assessment(&run_id).await {
                    Ok(report) => {
                        consecutive_errors = 0;
                        run.apply(&report);
                        match run.status {
                            RunStatus::Completed => break RunOutcome::Completed,
                            RunStatus::Failed => {
                                break RunOutcome::Failed(run.error.clone().unwrap_or_else(
                                    || "assessment failed without a reported reason".to_string(),
                                ))
                            }
                            // A well-formed report with a missing or
                            // unrecognized outcome is terminal; the run is
                            // never re-polled after it.
                            RunStatus::Unknown => {
                                break RunOutcome::Failed(run.error.clone().unwrap_or_else(
                                    || "assessment reported an unrecognized status".to_string(),
                                ))
                            }
                            RunStatus::Pending | RunStatus::Running => {
                                debug!(run_id = %run_id, status = %run.status, "assessment in progress");
                            }
                        }
                    }
                    Err(e) if e.is_transient() => {
                        consecutive_errors += 1;
                        warn!(
                            run_id = %run_id,
                            consecutive = consecutive_errors,
                            error = %e,
                            "poll failed, retrying on next tick"
                        );
                        let _ = events.send(ConsoleEvent::PollTransportError {
                            run_id: run_id.clone(),
                            error: e.to_string(),
                        });
                        if opts.max_consecutive_poll_errors > 0
                            && consecutive_errors >= opts.max_consecutive_poll_errors
                        {
                            break RunOutcome::Failed(format!(
                                "assessment service unreachable after {consecutive_errors} consecutive poll failures"
                            ));
                        }
                    }
                    Err(e) => {
                        // Well-formed remote failure (e.g. the run id is
                        // gone): terminal for this run, no retry-in-place.
                        break RunOutcome::Failed(e.to_string());
                    }
                }
            };

            // Terminal transition. The ticker is dropped before any other
            // effect so no further poll can race the handling below.
            drop(ticker);

            // Whoever takes the slot owns the one control release. A
            // concurrent client cancellation may have beaten us to it.
            if in_flight.lock().await.take().is_none() {
                return;
            }
            let _ = events.send(ConsoleEvent::ControlReleased);

            match outcome {
                RunOutcome::Completed => {
                    info!(run_id = %run_id, "assessment completed");
                    let _ = events.send(ConsoleEvent::RunCompleted {
                        run_id: run_id.clone(),
                    });
                    // Completed runs refresh the summary so the panels
                    // reflect the new results.
                    match gateway.fetch_summary().await {
                        Ok(doc) => {
                            let _ = events.send(ConsoleEvent::SummaryFetched(Box::new(doc)));
                        }
                        Err(e) => {
                            warn!(error = %e, "post-completion summary refetch failed");
                            let _ = events.send(ConsoleEvent::RefreshFailed {
                                error: e.to_string(),
                            });
                        }
                    }
                }
                RunOutcome::Failed(error) => {
                    warn!(run_id = %run_id, error = %error, "assessment failed");
                    let _ = events.send(ConsoleEvent::RunFailed {
                        run_id: run_id.clone(),
                        error,
                    });
                }
            }
        });
    }
}
