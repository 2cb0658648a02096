//! # Verify Handler
//!
//! Creates a verification request for the harness and records a `Pending`
//! verification session. The upstream verifier redirects the wallet to the
//! façade's callback pages, which complete the session.

use crate::error::invalid;
use crate::handlers::{Body, Error, Handler, Request, Response, Result, required};
use crate::provider::Provider;
use crate::types::{VerifyRequest, VerifyResponse};
use crate::{qr, requestor, session};

async fn verify(
    base_url: &str, provider: &impl Provider, request: VerifyRequest,
) -> Result<VerifyResponse> {
    let (session_id, credential_type) = request.verify()?;

    let verification_uri =
        requestor::request_verification(provider, credential_type, base_url).await?;
    session::create_verification_session(provider, session_id, &verification_uri).await?;
    let qr = qr::data_url(&verification_uri)?;

    Ok(VerifyResponse {
        qr,
        session_id: session_id.to_string(),
        verification_uri,
    })
}

impl<P: Provider> Handler<VerifyResponse, P> for Request<VerifyRequest> {
    type Error = Error;

    async fn handle(self, base_url: &str, provider: &P) -> Result<Response<VerifyResponse>> {
        Ok(verify(base_url, provider, self.body).await?.into())
    }
}

impl Body for VerifyRequest {}

impl VerifyRequest {
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
