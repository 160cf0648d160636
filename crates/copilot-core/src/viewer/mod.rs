//! Task viewers: the session list (Task Store backed) and the history list
//! (API backed), the row and detail view-models they share, and the master
//! resume editor.

pub mod actions;
pub mod detail;
pub mod history;
pub mod resume;
pub mod session;
pub mod summary;

pub use detail::JobDetail;
pub use history::{HistoryPage, HistoryView, SkillsCache};
pub use resume::{load_master_resume, save_master_resume};
pub use session::{SessionRow, SessionView};
pub use summary::{FractionClass, JobSummary, MatchFraction};
