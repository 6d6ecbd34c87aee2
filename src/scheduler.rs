use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::events::ConsoleEvent;
use crate::gateway::Gateway;

/// Periodic background re-fetch of the summary view, independent of any
/// assessment run. Fetches once immediately so the session has panels to
/// show, then on every period. Each cycle's failure is reported and
/// swallowed; a bad cycle never stops the next one.
pub struct RefreshScheduler {
    gateway: Arc<dyn Gateway>,
    events: UnboundedSender<ConsoleEvent>,
    period: Duration,
}

impl RefreshScheduler {
    pub fn new(
        gateway: Arc<dyn Gateway>,
        events: UnboundedSender<ConsoleEvent>,
        period: Duration,
    ) -> Self {
        Self {
            gateway,
            events,
            period,
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }
                match self.gateway.fetch_summary().await {
                    Ok(doc) => {
                        debug!("summary refreshed");
                        let _ = self.events.send(ConsoleEvent::SummaryFetched(Box::new(doc)));
                    }
                    Err(e) => {
                        warn!(error = %e, "summary refresh failed, next cycle unaffected");
                        let _ = self.events.send(ConsoleEvent::RefreshFailed {
                            error: e.to_string(),
                        });
                    }
                }
            }
            debug!("refresh scheduler stopped");
        })
    }
}
