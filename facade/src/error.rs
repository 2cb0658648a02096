//! # Façade Errors
//!
//! Errors raised while processing harness, proxy and callback requests. Each
//! variant maps to the HTTP status the façade answers with.

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

/// Façade error codes.
#[derive(Error, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "error", content = "error_description")]
pub enum Error {
    /// A required query or body parameter is missing or invalid.
    #[error("{0}")]
    InvalidRequest(String),

    /// The harness session id has already been used.
    #[error("{0}")]
    Conflict(String),

    /// The requested credential type is not in the credential catalog.
    #[error("{0}")]
    UnsupportedCredentialType(String),

    /// No matching session or issuer identity.
    #[error("{0}")]
    NotFound(String),

    /// An upstream service answered with a non-success status.
    #[error("{0}")]
    Upstream(String),

    /// A URL could not be parsed or rewritten.
    #[error("{0}")]
    UrlParse(String),

    /// The façade encountered an unexpected condition.
    #[error("{0}")]
    ServerError(String),
}

impl Error {
    /// The HTTP status code returned for the error.
    ///
    /// `NotFound` answers with 500 rather than 404: harnesses written against
    /// the existing service expect it.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::Conflict(_) | Self::UnsupportedCredentialType(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound(_) | Self::Upstream(_) | Self::UrlParse(_) | Self::ServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The error as a proxy-style JSON body: `{"error": "<reason>"}`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({"error": self.to_string()})
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        // prefix the inner description with any context added along the way
        let describe = |inner: &String| {
            let outer = err.to_string();
            if &outer == inner { outer } else { format!("{outer}: {inner}") }
        };

        match err.downcast_ref::<Self>() {
            Some(Self::InvalidRequest(e)) => Self::InvalidRequest(describe(e)),
            Some(Self::Conflict(e)) => Self::Conflict(describe(e)),
            Some(Self::UnsupportedCredentialType(e)) => {
                Self::UnsupportedCredentialType(describe(e))
            }
            Some(Self::NotFound(e)) => Self::NotFound(describe(e)),
            Some(Self::Upstream(e)) => Self::Upstream(describe(e)),
            Some(Self::UrlParse(e)) => Self::UrlParse(describe(e)),
            Some(Self::ServerError(e)) => Self::ServerError(describe(e)),
            None => {
                let stack = err.chain().fold(String::new(), |cause, e| format!("{cause} -> {e}"));
                let stack = stack.trim_start_matches(" -> ").to_string();
                Self::ServerError(stack)
            }
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::UrlParse(format!("invalid URL: {err}"))
    }
}

/// Construct an `Error::InvalidRequest` error from a string or existing error
/// value.
macro_rules! invalid {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::InvalidRequest(format!($fmt, $($arg)*))
    };
     ($err:expr $(,)?) => {
        $crate::Error::InvalidRequest(format!($err))
    };
}
pub(crate) use invalid;

/// Construct an `Error::ServerError` error from a string or existing error
/// value.
macro_rules! server {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::ServerError(format!($fmt, $($arg)*))
    };
     ($err:expr $(,)?) => {
        $crate::Error::ServerError(format!($err))
    };
}
pub(crate) use server;
