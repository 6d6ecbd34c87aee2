use std::time::Duration;
use tokio_util::sync::CancellationToken;

use crate::config::ConsoleConfig;

/// Observable phase of the lifecycle tracker. `Terminal` is instantaneous
/// from the outside: the tracker discards the run identifier on any terminal
/// transition and reports `Idle` again, ready for a fresh run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Starting,
    Polling,
}

/// Contents of the single-flight slot while the control lock is held.
#[derive(Debug)]
pub(crate) enum InFlight {
    /// Create-run request is in progress; no run id or timer exists yet.
    Starting,
    /// The poll timer is live for this run.
    Polling {
        run_id: String,
        cancel: CancellationToken,
    },
}

/// Terminal outcome of a tracked run, produced by the poll loop.
#[derive(Debug, Clone)]
pub(crate) enum RunOutcome {
    Completed,
    Failed(String),
}

/// Tracking limits. The platform imposes no bound on how long a run may
/// stay non-terminal, so the console enforces its own ceilings; a value of
/// zero disables that ceiling (the config parser rejects disabling both).
#[derive(Debug, Clone)]
pub struct TrackerOptions {
    pub poll_interval: Duration,
    pub max_consecutive_poll_errors: u32,
    pub poll_timeout: Duration,
}

impl Default for TrackerOptions {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(5),
            max_consecutive_poll_errors: 10,
            poll_timeout: Duration::from_secs(1800),
        }
    }
}

impl TrackerOptions {
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            poll_interval: config.poll_interval(),
            max_consecutive_poll_errors: config.max_consecutive_poll_errors,
            poll_timeout: config.poll_timeout(),
        }
    }
}
