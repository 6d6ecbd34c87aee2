pub mod lifecycle;
pub mod state;

pub use lifecycle::LifecycleTracker;
pub use state::{RunPhase, TrackerOptions};
