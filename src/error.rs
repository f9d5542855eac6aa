//! Error types for the Postita client.

use reqwest::StatusCode;

/// Errors returned by [`Client`](crate::Client) operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport failure: connection refused, DNS, timeout, or body read.
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service answered with a non-2xx status.
    ///
    /// `body` is the response body exactly as the server sent it.
    #[error("server returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// A successful response did not contain valid JSON.
    #[error("failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading a document from disk failed.
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP status of the failed call, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Request(err) => err.status(),
            _ => None,
        }
    }

    /// `400`: malformed request, or the job is not in the state the operation needs.
    pub fn is_bad_request(&self) -> bool {
        self.status() == Some(StatusCode::BAD_REQUEST)
    }

    /// `401`: the credentials were rejected.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }

    /// `404`: the referenced job does not exist.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}
