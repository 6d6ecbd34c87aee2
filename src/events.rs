use crate::models::SummaryDocument;

/// Messages sent from the background tasks (lifecycle tracker, refresh
/// scheduler) to the console session for display.
#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    /// The assess control was locked for a new run
    ControlLocked,
    /// The assess control was released; sent exactly once per run, on any
    /// terminal transition or on start failure
    ControlReleased,
    /// Create-run succeeded and polling begins
    RunStarted { run_id: String },
    /// Create-run failed; no poll was ever scheduled
    StartFailed { error: String },
    /// A single poll failed transiently; tracking continues on the next tick
    PollTransportError { run_id: String, error: String },
    /// The run reported completion
    RunCompleted { run_id: String },
    /// The run reported failure (or hit a tracking ceiling)
    RunFailed { run_id: String, error: String },
    /// A fresh summary document arrived (periodic refresh or the refetch
    /// after a completed run)
    SummaryFetched(Box<SummaryDocument>),
    /// A summary fetch failed; previously rendered panels stay untouched
    RefreshFailed { error: String },
}
