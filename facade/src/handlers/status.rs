//! # Status Tracker
//!
//! Reports session state to the harness and accepts verification outcomes
//! from the upstream verifier's redirect.
//!
//! Issuance sessions move `Pending -> Read` when a wallet fetches the offer
//! (see [`super::offer`]). Verification sessions move from `Pending` to
//! `Completed` or `Failed` through [`set_verification_status`], which
//! overwrites the state without checking the transition and does not
//! authenticate its caller.

use anyhow::Context as _;

use crate::error::invalid;
use crate::handlers::{Body, Error, Handler, Request, Response, Result, required};
use crate::provider::{Provider, SessionStore};
use crate::types::{
    IssuanceSession, IssueStatusRequest, IssueStatusResponse, StatusResponse,
    UpdateStatusRequest, UpdateStatusResponse, VerificationSession, VerificationState,
    VerifyStatusRequest, VerifyStatusResponse,
};

/// Current state of the issuance session for `harness_session_id`.
///
/// # Errors
///
/// Returns `Error::NotFound` if there is no such session.
pub async fn get_issuance_status(
    store: &impl SessionStore, harness_session_id: &str,
) -> Result<IssueStatusResponse> {
    let session: IssuanceSession = SessionStore::get(store, harness_session_id)
        .await
        .context("issue retrieving session")?
        .ok_or_else(|| Error::NotFound("no issuance session found".to_string()))?;
    Ok(StatusResponse::ok(session.harness_session_id, session.state))
}

/// Current state of the verification session for `harness_session_id`.
///
/// # Errors
///
/// Returns `Error::NotFound` if there is no such session.
pub async fn get_verification_status(
    store: &impl SessionStore, harness_session_id: &str,
) -> Result<VerifyStatusResponse> {
    let session: VerificationSession = SessionStore::get(store, harness_session_id)
        .await
        .context("issue retrieving session")?
        .ok_or_else(|| Error::NotFound("no verification session found".to_string()))?;
    Ok(StatusResponse::ok(session.harness_session_id, session.state))
}

/// Set the state of the verification session the upstream verifier knows as
/// `upstream_session_id`.
///
/// # Errors
///
/// Returns `Error::NotFound` if no verification session matches the upstream
/// id.
pub async fn set_verification_status(
    store: &impl SessionStore, upstream_session_id: &str, state: VerificationState,
) -> Result<VerificationSession> {
    let mut session: VerificationSession = SessionStore::find(store, upstream_session_id)
        .await
        .context("issue retrieving session")?
        .ok_or_else(|| {
            Error::NotFound(format!("no verification session found for {upstream_session_id}"))
        })?;

    tracing::debug!(
        "verification session {}: {} -> {state}",
        session.harness_session_id,
        session.state
    );
    session.state = state;
    SessionStore::update(store, &session).await.context("issue updating session")?;

    Ok(session)
}

impl<P: Provider> Handler<IssueStatusResponse, P> for Request<IssueStatusRequest> {
    type Error = Error;

    async fn handle(self, _: &str, provider: &P) -> Result<Response<IssueStatusResponse>> {
        let session_id = required(self.body.session_id.as_ref(), missing_session_id)?;
        Ok(get_issuance_status(provider, session_id).await?.into())
    }
}

impl Body for IssueStatusRequest {}

impl<P: Provider> Handler<VerifyStatusResponse, P> for Request<VerifyStatusRequest> {
    type Error = Error;

    async fn handle(self, _: &str, provider: &P) -> Result<Response<VerifyStatusResponse>> {
        let session_id = required(self.body.session_id.as_ref(), missing_session_id)?;
        Ok(get_verification_status(provider, session_id).await?.into())
    }
}

impl Body for VerifyStatusRequest {}

impl<P: Provider> Handler<UpdateStatusResponse, P> for Request<UpdateStatusRequest> {
    type Error = Error;

    async fn handle(self, _: &str, provider: &P) -> Result<Response<UpdateStatusResponse>> {
        let (id, state) = self.body.verify()?;
        set_verification_status(provider, id, state).await?;
        Ok(UpdateStatusResponse {
            message: "Update successful".to_string(),
        }
        .into())
    }
}

impl Body for UpdateStatusRequest {}

impl UpdateStatusRequest {
    fn verify(&self) -> Result<(&str, VerificationState)> {
        let id = required(self.id.as_ref(), || invalid!("Missing or invalid 'id' parameter"))?;
        let state = self
            .state
            .as_deref()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| invalid!("Missing or invalid 'state' parameter"))?;
        Ok((id, state))
    }
}

fn missing_session_id() -> Error {
    invalid!("Missing sessionId in query parameters.")
}
