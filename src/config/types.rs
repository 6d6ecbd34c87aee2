use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Console configuration, loaded from YAML with every field optional in the
/// file; absent fields take these defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Organization name shown in the summary header.
    pub organization: String,
    /// Base URL of the platform API.
    pub base_url: String,
    /// Seconds between polls of an in-flight assessment run.
    pub poll_interval_secs: u64,
    /// Seconds between periodic summary refreshes.
    pub refresh_interval_secs: u64,
    /// Recommendations shown inline before the view-more affordance.
    pub max_inline_recommendations: usize,
    /// Consecutive transient poll failures tolerated before the run is
    /// declared failed. Zero disables this ceiling.
    pub max_consecutive_poll_errors: u32,
    /// Wall-clock ceiling on tracking one run, in seconds. Zero disables
    /// this ceiling.
    pub poll_timeout_secs: u64,
    /// How long a notification stays visible.
    pub notification_ttl_secs: u64,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            organization: "Default Organization".to_string(),
            base_url: "http://localhost:8080/api".to_string(),
            poll_interval_secs: 5,
            refresh_interval_secs: 60,
            max_inline_recommendations: 5,
            max_consecutive_poll_errors: 10,
            poll_timeout_secs: 1800,
            notification_ttl_secs: 5,
        }
    }
}

impl ConsoleConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    pub fn poll_timeout(&self) -> Duration {
        Duration::from_secs(self.poll_timeout_secs)
    }

    pub fn notification_ttl(&self) -> Duration {
        Duration::from_secs(self.notification_ttl_secs)
    }
}
