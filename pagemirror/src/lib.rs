// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::normalize_target;

// Re-export mirror functionality from pagemirror-core
pub use pagemirror_core::mirror::{MirrorOptions, MirrorSummary, execute_mirror};
pub use pagemirror_core::report::{ReportFormat, generate_json_report, generate_text_report};
