//! Error types for the supabase_scope crate

use thiserror::Error;

/// Errors surfaced by the request-scoped client cache
#[derive(Debug, Error)]
pub enum SupabaseError {
    /// Required connection settings are missing or empty.
    ///
    /// Raised before any construction attempt and never logged here.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The backend client could not be constructed
    #[error("Failed to create Supabase client: {0}")]
    Construction(#[from] ClientError),

    /// Error returned by the backend authentication API, passed through as is
    #[error(transparent)]
    Auth(#[from] AuthError),
}

impl SupabaseError {
    pub(crate) fn missing_credentials() -> Self {
        Self::Configuration(
            "SUPABASE_URL and SUPABASE_KEY must be set either in the application config or environment variables"
                .to_string(),
        )
    }
}

/// Errors raised while constructing a backend client
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid API key")]
    InvalidKey,

    #[error("Invalid client options: {0}")]
    InvalidOptions(String),

    #[error("HTTP client error: {0}")]
    Http(String),
}

/// Errors raised by the authentication API
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// The auth server answered with a non-success status
    #[error("Auth API error ({status}): {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("Auth transport error: {0}")]
    Http(String),

    #[error("Serde error: {0}")]
    Serde(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Crypto error: {0}")]
    Crypto(String),
}

impl AuthError {
    /// HTTP status reported by the auth server, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
