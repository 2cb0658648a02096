//! # Configuration
//!
//! Upstream service locations and the façade's own base URL. Resolved once at
//! start-up and handed to the components that need it.

use std::env;

use anyhow::{Context, Result};
use http::HeaderMap;
use http::header::HOST;

/// Façade configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Base URL of the upstream credential issuer (`ISSUER_URL`).
    pub issuer_url: String,

    /// Base URL of the upstream verifier (`VERIFIER_URL`).
    pub verifier_url: String,

    /// Base URL of the credential catalog (`VC_REPO_URL`).
    pub vc_repo_url: String,

    /// The façade's externally visible base URL (`BASE_URL`). When unset, the
    /// base URL is reconstructed from each request's headers.
    pub base_url: Option<String>,
}

impl Config {
    /// Load configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error when `ISSUER_URL`, `VERIFIER_URL` or `VC_REPO_URL` is
    /// not set.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration using `lookup` to resolve each variable.
    ///
    /// # Errors
    ///
    /// Returns an error when a required variable is not set.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .map(|v| trim(&v))
                .with_context(|| format!("{key} is not set"))
        };

        Ok(Self {
            issuer_url: required("ISSUER_URL")?,
            verifier_url: required("VERIFIER_URL")?,
            vc_repo_url: required("VC_REPO_URL")?,
            base_url: lookup("BASE_URL").filter(|v| !v.is_empty()).map(|v| trim(&v)),
        })
    }

    /// The façade's base URL for a request: `BASE_URL` when configured,
    /// otherwise `{x-forwarded-proto}://{host}` taken from the request
    /// headers (the scheme defaulting to `http`).
    #[must_use]
    pub fn base_url(&self, headers: &HeaderMap) -> String {
        if let Some(base_url) = &self.base_url {
            return base_url.clone();
        }
        let proto = headers
            .get("x-forwarded-proto")
            .and_then(|v| v.to_str().ok())
            .unwrap_or("http");
        let host = headers.get(HOST).and_then(|v| v.to_str().ok()).unwrap_or("localhost");
        format!("{proto}://{host}")
    }
}

fn trim(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}
