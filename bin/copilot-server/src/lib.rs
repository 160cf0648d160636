//! copilot-server: the Job Search Copilot HTTP service.
//!
//! JSON routes under `/v1` drive the task pipeline and the history actions;
//! `/pages` serves the rendered sidebar, session, history and resume views.

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schemas;
pub mod state;

pub use config::Config;
pub use error::ServerError;
pub use state::AppState;
