//! Terminal UI for the chat client

pub mod app;
pub mod composer;
pub mod history;
pub mod sidebar;
pub mod triage;

pub use app::{ChatApp, run};
pub use composer::Composer;
pub use history::HistoryView;
pub use sidebar::Sidebar;
pub use triage::TriageOverlay;
