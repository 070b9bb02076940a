use reqwest::StatusCode;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Not signed in: {0}")]
    Auth(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Remote error ({status}): {}", .message.as_deref().unwrap_or("no message"))]
    Remote {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("A submission is already in progress")]
    Busy,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Message shown to the user. Gateway-supplied messages are passed through
    /// verbatim; anything without a usable message falls back to `fallback`.
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::Remote {
                message: Some(msg), ..
            } if !msg.trim().is_empty() => msg.clone(),
            Error::Auth(_) => "Please sign in to continue".to_string(),
            Error::Busy => "Please wait for the current request to finish".to_string(),
            _ => fallback.to_string(),
        }
    }

    /// Like `user_message`, but gateway text is replaced by `fallback`. Used
    /// where the view shows a fixed failure notice.
    pub fn notice(&self, fallback: &str) -> String {
        match self {
            Error::Remote { .. } => fallback.to_string(),
            _ => self.user_message(fallback),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, Error::Auth(_))
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Error::Validation(err.to_string())
    }
}
