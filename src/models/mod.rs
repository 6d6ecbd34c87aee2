pub mod detail;
pub mod module;
pub mod run;
pub mod summary;

pub use module::ModuleKind;
pub use run::{AssessmentRun, RunStatus, RunStatusReport};
pub use summary::{ModuleStatus, Priority, Recommendation, RiskLevel, SummaryDocument};
