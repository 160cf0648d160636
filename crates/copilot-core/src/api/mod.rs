//! Client for the local extraction/assessment API.

mod client;
mod error;

pub use client::{ApiClient, DEFAULT_BASE_URL};
pub use error::ApiError;
