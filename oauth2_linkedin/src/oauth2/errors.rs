use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::utils::UtilError;

/// Local failures of the strategy itself (configuration, randomness, headers).
#[derive(Debug, Error, Clone)]
pub enum OAuth2Error {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Http client error: {0}")]
    HttpClient(String),

    /// Error from utils operations
    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

/// Failures reported by the callback pipeline.
///
/// These are never raised to the host; they are recorded on the
/// [`AuthSession`](super::AuthSession) as [`AuthFailure`]s.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallbackError {
    /// The provider rejected the access token on a resource call (HTTP 401)
    #[error("unauthorized")]
    Unauthorized,

    /// Transport or protocol failure talking to the provider
    #[error("{0}")]
    OAuth2(String),

    #[error("CSRF token mismatch")]
    CsrfMismatch,

    #[error("No code received")]
    MissingCode,

    /// Error reported verbatim by the provider
    #[error("{description}")]
    Provider { error: String, description: String },
}

impl CallbackError {
    pub fn kind(&self) -> &str {
        match self {
            Self::Unauthorized => "token",
            Self::OAuth2(_) => "OAuth2",
            Self::CsrfMismatch => "csrf",
            Self::MissingCode => "missing_code",
            Self::Provider { error, .. } => error,
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

/// A `{kind, message}` pair attached to the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthFailure {
    pub kind: String,
    pub message: String,
}

impl From<CallbackError> for AuthFailure {
    fn from(err: CallbackError) -> Self {
        Self {
            kind: err.kind().to_string(),
            message: err.message(),
        }
    }
}

impl std::fmt::Display for AuthFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}
