use thiserror::Error;

/// Errors caused by the request itself rather than the workspace or traversal.
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("Project not found: {0}")]
    UnknownProject(String),

    #[error("Bad identity {name}: {reason}")]
    BadIdentity { name: String, reason: String },

    #[error("Invalid search pattern: {pattern}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl RequestError {
    /// True when `err` (or anything in its chain) is a request error.
    pub fn is_request_error(err: &anyhow::Error) -> bool {
        err.downcast_ref::<RequestError>().is_some()
    }
}
