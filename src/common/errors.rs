//! Error types for the application

use thiserror::Error;

/// Result type alias using our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Main error type for UI coordination and backend calls
#[derive(Error, Debug)]
pub enum AppError {
    /// The backend rejected a command; carries the backend's own message
    #[error("{0}")]
    RemoteCall(String),

    /// Invalid or duplicate selection detected before any backend call
    #[error("{0}")]
    Validation(String),

    /// The save dialog was dismissed without a path
    #[error("O usuário cancelou o diálogo.")]
    UserCancelled,

    /// HTTP transport errors talking to the backend process
    #[error("HTTP request error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Event stream errors
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// JSON serialization/deserialization errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A date label or timestamp that cannot be converted
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// Local I/O errors (dialogs, prompts)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<tokio_tungstenite::tungstenite::Error> for AppError {
    fn from(err: tokio_tungstenite::tungstenite::Error) -> Self {
        AppError::WebSocket(err.to_string())
    }
}

impl From<url::ParseError> for AppError {
    fn from(err: url::ParseError) -> Self {
        AppError::Configuration(format!("invalid URL: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_call_displays_backend_message_verbatim() {
        let err = AppError::RemoteCall("o grupo das 14 horas do 1º premio já está cadastrado".into());
        assert_eq!(
            err.to_string(),
            "o grupo das 14 horas do 1º premio já está cadastrado"
        );
    }

    #[test]
    fn test_cancel_message() {
        assert_eq!(AppError::UserCancelled.to_string(), "O usuário cancelou o diálogo.");
    }
}
