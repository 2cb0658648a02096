//! # Credential Proxy
//!
//! Relays a wallet's credential request to the upstream issuer unchanged and
//! returns the issuer's status and body.

use anyhow::Context as _;
use http::HeaderMap;
use serde_json::Value;

use crate::api::ForwardHeaders;
use crate::handlers::{Body, Error, Handler, Request, Response, Result};
use crate::provider::{IssuerService, Provider};
use crate::types::{CredentialRequest, UpstreamResponse};

/// Forward a credential request to the upstream issuer.
///
/// # Errors
///
/// Returns `Error::Upstream` if the issuer answers with a non-success status.
pub async fn relay_credential_issuance(
    provider: &impl IssuerService, headers: &HeaderMap, body: &str,
) -> Result<UpstreamResponse> {
    let response = IssuerService::credential(provider, headers, body)
        .await
        .context("forwarding credential request")?;
    Ok(response)
}

impl<P: Provider> Handler<Value, P> for Request<CredentialRequest, ForwardHeaders> {
    type Error = Error;

    async fn handle(self, _: &str, provider: &P) -> Result<Response<Value>> {
        let ForwardHeaders(headers) = &self.headers;
        let UpstreamResponse { status, body } =
            relay_credential_issuance(provider, headers, &self.body.body).await?;
        Ok(Response { status, body })
    }
}

impl Body for CredentialRequest {}
