use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolveError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Solve endpoint returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

impl SolveError {
    /// Network failures and non-success statuses.
    pub fn is_transport(&self) -> bool {
        matches!(self, SolveError::Transport(_) | SolveError::Status { .. })
    }
}

pub type Result<T> = std::result::Result<T, SolveError>;
