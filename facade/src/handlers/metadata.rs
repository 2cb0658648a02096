//! # Metadata Handler
//!
//! Serves the upstream issuer's `.well-known/openid-credential-issuer`
//! document with its identifiers pointed at the façade.

use anyhow::Context as _;
use serde_json::Value;

use crate::error::server;
use crate::handlers::{Body, Error, Handler, Request, Response, Result};
use crate::provider::{IssuerService, Provider};
use crate::types::MetadataRequest;

/// The upstream issuer's metadata with `issuer` and `credential_issuer` set
/// to `base_url`.
///
/// # Errors
///
/// Returns `Error::Upstream` if the issuer's metadata cannot be fetched.
pub async fn issuer_metadata(base_url: &str, provider: &impl IssuerService) -> Result<Value> {
    let mut metadata =
        IssuerService::metadata(provider).await.context("fetching issuer metadata")?;
    let Some(fields) = metadata.as_object_mut() else {
        return Err(server!("issuer metadata is not an object"));
    };
    fields.insert("issuer".to_string(), Value::String(base_url.to_string()));
    // The façade base URL itself, not the base URL with the well-known path
    // appended.
    fields.insert("credential_issuer".to_string(), Value::String(base_url.to_string()));
    Ok(metadata)
}

impl<P: Provider> Handler<Value, P> for Request<MetadataRequest> {
    type Error = Error;

    async fn handle(self, base_url: &str, provider: &P) -> Result<Response<Value>> {
        Ok(issuer_metadata(base_url, provider).await?.into())
    }
}

impl Body for MetadataRequest {}
