use derive_more::Display;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// Defines the provider's custom error types.
///
#[derive(Debug, Error)]
pub enum Error {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Timeout after: {0} seconds")]
    Timeout(f32),
    #[error("Status query failed: {0}")]
    StatusQuery(Box<Error>),
    #[error("Authentication error: {0}")]
    Auth(AuthError),
    #[error("Isard API error: {0} failed: status {1}, body: {2}")]
    Isard(IsardError, reqwest::StatusCode, String),
    #[error("Header convert error: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Environment error: {0}")]
    Environment(#[from] dotenv::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Failed to set logger: {0}")]
    Logger(#[from] tracing_log::log::SetLoggerError),
    #[error("IO error: {0}")]
    InputOutput(#[from] std::io::Error),
    #[error("Telemetry error: {0}")]
    Telemetry(#[from] tracing::dispatcher::SetGlobalDefaultError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),
}

impl Error {
    /// Returns `true` when the remote entity does not exist, either because
    /// the API answered with `404` or because a lookup came back empty.
    ///
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::NotFound(_) => true,
            Error::Isard(_, status, _) => *status == reqwest::StatusCode::NOT_FOUND,
            _ => false,
        }
    }
}

/// Represents authentication-related errors.
///
#[derive(Debug, Display)]
pub enum AuthError {
    #[display("missing token")]
    MissingToken,
    #[display("missing credentials")]
    MissingCredentials,
    #[display("empty token in login response")]
    EmptyToken,
}

/// Represents the Isard API operation that failed.
///
#[derive(Debug, Clone, Copy, PartialEq, Display)]
pub enum IsardError {
    SignIn,
    Create,
    Read,
    Update,
    Delete,
    List,
    Search,
    Stop,
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn not_found_is_recognised_from_status() {
        let error = Error::Isard(IsardError::Read, StatusCode::NOT_FOUND, String::new());
        assert!(error.is_not_found());
        assert!(Error::NotFound("media".into()).is_not_found());
    }

    #[test]
    fn other_statuses_are_not_not_found() {
        let error = Error::Isard(IsardError::Read, StatusCode::FORBIDDEN, "nope".into());
        assert!(!error.is_not_found());
        assert!(!Error::Timeout(1.0).is_not_found());
    }

    #[test]
    fn api_error_message_carries_status_and_body() {
        let error = Error::Isard(
            IsardError::Delete,
            StatusCode::INTERNAL_SERVER_ERROR,
            "boom".into(),
        );
        assert_eq!(
            error.to_string(),
            "Isard API error: Delete failed: status 500 Internal Server Error, body: boom"
        );
    }
}
