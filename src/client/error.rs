use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
    /// Non-2xx answer from the server, carrying its `{message}`.
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Please log in to continue")]
    NotLoggedIn,
    #[error("Session file error: {0}")]
    Session(#[from] std::io::Error),
    #[error("Invalid data: {0}")]
    Format(#[from] serde_json::Error),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
