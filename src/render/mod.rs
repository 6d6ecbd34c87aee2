pub mod detail;
pub mod notify;
pub mod summary;

pub use detail::{resolve_detail, DetailPanel, PanelBody};
pub use notify::{NotificationSink, NoticeKind};
pub use summary::{render_summary, SummaryPanels};
