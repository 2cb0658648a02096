//! # Handlers
//!
//! `handle` is the entry point for every façade request. Typed request bodies
//! are routed to their handler, returning a response that can be serialized
//! to JSON by the HTTP layer.

pub mod credential;
pub mod issue;
pub mod metadata;
pub mod offer;
pub mod status;
pub mod verify;

use std::fmt::Debug;

use tracing::instrument;

pub use crate::api::{Body, Handler, Headers, Request, Response};
pub use crate::error::Error;
use crate::provider::Provider;

/// Result type for façade operations.
pub type Result<T, E = Error> = anyhow::Result<T, E>;

/// Handle an incoming request.
///
/// `base_url` is the façade's externally visible base URL. It is used to
/// rewrite URLs handed to wallets and to the upstream services so they point
/// back at the façade.
///
/// # Errors
///
/// Fails when the request is missing required parameters, when a session
/// cannot be created or found, or when an upstream service fails. See
/// [`Error`] for the HTTP status each failure maps to.
#[instrument(level = "debug", skip(provider))]
pub async fn handle<B, H, P, U>(
    base_url: &str, request: impl Into<Request<B, H>> + Debug, provider: &P,
) -> Result<Response<U>>
where
    B: Body,
    H: Headers,
    P: Provider,
    Request<B, H>: Handler<U, P, Error = Error>,
{
    let request: Request<B, H> = request.into();
    Ok(request.handle(base_url, provider).await?.into())
}

// A required, non-empty request parameter.
fn required<'a>(value: Option<&'a String>, error: impl FnOnce() -> Error) -> Result<&'a str> {
    value.map(String::as_str).filter(|v| !v.is_empty()).ok_or_else(error)
}
