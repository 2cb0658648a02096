//! # Offer Proxy
//!
//! Wallets scanning a rewritten offer URI fetch the credential offer from the
//! façade. The request is relayed to the upstream issuer, the matching
//! issuance session is marked `Read`, and the offer's `credential_issuer` is
//! pointed at the façade.

use anyhow::Context as _;
use serde_json::Value;

use crate::error::{invalid, server};
use crate::handlers::{Body, Error, Handler, Request, Response, Result, required};
use crate::provider::{IssuerService, Provider, SessionStore};
use crate::types::{IssuanceSession, IssuanceState, OfferRequest};

/// Fetch the credential offer `upstream_session_id` from the upstream issuer
/// and mark its issuance session `Read`.
///
/// # Errors
///
/// Returns `Error::Upstream` if the issuer does not return the offer and
/// `Error::NotFound` if no issuance session matches the offer id. No session
/// is changed in either case.
pub async fn relay_offer_fetch<P>(
    base_url: &str, provider: &P, upstream_session_id: &str,
) -> Result<Value>
where
    P: IssuerService + SessionStore,
{
    let mut offer = IssuerService::credential_offer(provider, upstream_session_id)
        .await
        .context("fetching credential offer")?;
    let Some(fields) = offer.as_object_mut() else {
        return Err(server!("credential offer {upstream_session_id} is not an object"));
    };

    let mut session: IssuanceSession = SessionStore::find(provider, upstream_session_id)
        .await
        .context("issue retrieving session")?
        .ok_or_else(|| {
            Error::NotFound(format!("no issuance session found for offer {upstream_session_id}"))
        })?;

    if session.state != IssuanceState::Read {
        tracing::debug!("issuance session {}: offer read", session.harness_session_id);
        session.state = IssuanceState::Read;
        SessionStore::update(provider, &session).await.context("issue updating session")?;
    }

    fields.insert("credential_issuer".to_string(), Value::String(base_url.to_string()));
    Ok(offer)
}

impl<P: Provider> Handler<Value, P> for Request<OfferRequest> {
    type Error = Error;

    async fn handle(self, base_url: &str, provider: &P) -> Result<Response<Value>> {
        let id = required(self.body.id.as_ref(), || {
            invalid!("Missing or invalid 'id' query parameter")
        })?;
        Ok(relay_offer_fetch(base_url, provider, id).await?.into())
    }
}

impl Body for OfferRequest {}
