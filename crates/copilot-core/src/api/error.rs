use thiserror::Error;

/// Errors returned by [`super::ApiClient`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success HTTP status. `message` is the server's `detail` when it
    /// sent one, otherwise `API Error: <status>`.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// A success response whose body did not have the expected shape.
    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    pub(crate) fn status(status: u16, detail: Option<String>) -> Self {
        ApiError::Status {
            status,
            message: detail.unwrap_or_else(|| format!("API Error: {status}")),
        }
    }

    /// HTTP status for [`ApiError::Status`], `None` otherwise.
    pub fn http_status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}
