//! Sync error types.

use thiserror::Error;

use super::submit::SubmissionPlan;

/// Errors from a single backend request.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Transport failure (connection refused, timeout, ...)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("Server returned status {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape
    #[error("Failed to decode response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// Errors from a bulk submission.
#[derive(Error, Debug)]
pub enum SubmitError {
    #[error("No aviary selected")]
    NoAviarySelected,

    #[error("Aviary id '{0}' is not a backend id")]
    InvalidAviaryId(String),

    /// A request failed; steps before it were submitted and are not rolled back.
    #[error("Failed to submit '{category}': {source}")]
    Request {
        category: String,
        #[source]
        source: ApiError,
        report: SubmissionPlan,
    },
}
