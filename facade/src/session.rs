//! # Session Creation
//!
//! Records a new `Pending` session for each offer or verification request
//! handed to the harness. Creation is a single conditional insert: a harness
//! session id that is already in use is rejected with `Error::Conflict`.

use anyhow::Context as _;
use serde_json::Map;
use url::Url;
use url::form_urlencoded;

use crate::error::{Error, server};
use crate::provider::{Inserted, Session, SessionStore};
use crate::rewrite::{self, CREDENTIAL_OFFER_URI};
use crate::types::{IssuanceSession, IssuanceState, VerificationSession, VerificationState};

/// Create a `Pending` issuance session for `offer_uri`, keyed by the harness
/// session id and the upstream offer `id`.
///
/// # Errors
///
/// Returns `Error::Conflict` if `harness_session_id` is already in use and
/// `Error::ServerError` if the upstream offer id cannot be extracted.
pub async fn create_issuance_session(
    store: &impl SessionStore, harness_session_id: &str, offer_uri: &str,
) -> Result<IssuanceSession, Error> {
    let session = IssuanceSession {
        harness_session_id: harness_session_id.to_string(),
        upstream_session_id: offer_id(offer_uri)?,
        state: IssuanceState::Pending,
    };
    insert(store, session).await
}

/// Create a `Pending` verification session for `verification_uri`, keyed by
/// the harness session id and the upstream request's `state`.
///
/// # Errors
///
/// Returns `Error::Conflict` if `harness_session_id` is already in use and
/// `Error::ServerError` if the upstream session id cannot be extracted.
pub async fn create_verification_session(
    store: &impl SessionStore, harness_session_id: &str, verification_uri: &str,
) -> Result<VerificationSession, Error> {
    let session = VerificationSession {
        harness_session_id: harness_session_id.to_string(),
        upstream_session_id: verification_state(verification_uri)?,
        state: VerificationState::Pending,
        attributes: Map::new(),
    };
    insert(store, session).await
}

async fn insert<S: Session>(store: &impl SessionStore, session: S) -> Result<S, Error> {
    match SessionStore::insert(store, &session).await.context("issue saving session")? {
        Inserted::Created => {
            tracing::debug!(
                "created {} session {} -> {}",
                S::PARTITION,
                session.harness_session_id(),
                session.upstream_session_id()
            );
            Ok(session)
        }
        Inserted::Exists => Err(Error::Conflict(format!(
            "Session ID {} already used",
            session.harness_session_id()
        ))),
    }
}

/// The upstream offer id: the `id` parameter of the offer URI's nested
/// `credential_offer_uri`.
///
/// # Errors
///
/// Returns `Error::ServerError` when the offer URI does not carry a nested
/// offer URI or the nested URI has no `id`.
pub fn offer_id(offer_uri: &str) -> Result<String, Error> {
    let url = Url::parse(offer_uri)?;
    let Some(nested) = rewrite::nested_offer_uri(&url)? else {
        return Err(server!("offer URI has no {CREDENTIAL_OFFER_URI}: {offer_uri}"));
    };
    rewrite::query_value(&nested, "id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| server!("{CREDENTIAL_OFFER_URI} has no id: {nested}"))
}

/// The upstream verification session id: the `state` parameter of the
/// verification URI.
///
/// # Errors
///
/// Returns `Error::ServerError` when the verification URI has no `state`.
pub fn verification_state(verification_uri: &str) -> Result<String, Error> {
    let query = verification_uri.split_once('?').map_or("", |(_, query)| query);
    form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .filter(|state| !state.is_empty())
        .ok_or_else(|| server!("verification URI has no state: {verification_uri}"))
}
