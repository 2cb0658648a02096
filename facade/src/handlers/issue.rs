//! # Issue Handler
//!
//! Creates a credential offer for the harness: the upstream issuer mints the
//! offer, a `Pending` issuance session is recorded, and the offer URI is
//! rewritten so the wallet fetches the offer through the façade.

use crate::error::invalid;
use crate::handlers::{Body, Error, Handler, Request, Response, Result, required};
use crate::provider::Provider;
use crate::types::{IssueRequest, IssueResponse};
use crate::{qr, requestor, rewrite, session};

async fn issue(
    base_url: &str, provider: &impl Provider, request: IssueRequest,
) -> Result<IssueResponse> {
    let (session_id, credential_type) = request.verify()?;

    let offer_uri = requestor::request_issuance_offer(provider, credential_type).await?;
    session::create_issuance_session(provider, session_id, &offer_uri).await?;

    let credential_offer_uri = rewrite::rewrite_offer_uri(base_url, &offer_uri)?;
    let qr = qr::data_url(&credential_offer_uri)?;

    Ok(IssueResponse {
        qr,
        session_id: session_id.to_string(),
        credential_offer_uri,
    })
}

impl<P: Provider> Handler<IssueResponse, P> for Request<IssueRequest> {
    type Error = Error;

    async fn handle(self, base_url: &str, provider: &P) -> Result<Response<IssueResponse>> {
        Ok(issue(base_url, provider, self.body).await?.into())
    }
}

impl Body for IssueRequest {}

impl IssueRequest {
    // Returns the session id and credential type.
    fn verify(&self) -> Result<(&str, &str)> {
        let session_id = required(self.session_id.as_ref(), || {
            invalid!("Query parameter sessionId required!")
        })?;
        let credential_type = required(self.credential_type.as_ref(), || {
            invalid!("Query parameter credentialType required!")
        })?;
        Ok((session_id, credential_type))
    }
}
