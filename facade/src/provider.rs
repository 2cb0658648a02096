//! # Provider Traits
//!
//! The façade's external collaborators: the session store, the credential
//! catalog, the upstream issuer and verifier, and the issuer identity
//! registry. Library users implement these traits (or use
//! [`crate::HttpUpstream`] and [`crate::identity::StaticRegistry`] for the
//! upstream-facing ones) and pass the result to [`crate::handle`].

use std::future::Future;

use anyhow::Result;
use http::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

pub use crate::identity::{IssuerIdentity, IssuerRegistry};
use crate::types::{
    CredentialDefinition, CredentialFormat, IssuanceSession, UpstreamResponse, VerificationSession,
};

/// Façade Provider trait.
pub trait Provider:
    SessionStore + Catalog + IssuerService + VerifierService + IssuerRegistry + Clone
{
}

/// A blanket implementation for `Provider` trait so that any type implementing
/// the required super traits is considered a `Provider`.
impl<T> Provider for T where
    T: SessionStore + Catalog + IssuerService + VerifierService + IssuerRegistry + Clone
{
}

/// A session record held by the [`SessionStore`].
pub trait Session: Serialize + DeserializeOwned + Clone + Send + Sync {
    /// Storage partition for the record type.
    const PARTITION: &'static str;

    /// Session id assigned by the test harness. Unique per record type.
    fn harness_session_id(&self) -> &str;

    /// Session id assigned by the upstream service.
    fn upstream_session_id(&self) -> &str;
}

impl Session for IssuanceSession {
    const PARTITION: &'static str = "ISSUANCE";

    fn harness_session_id(&self) -> &str {
        &self.harness_session_id
    }

    fn upstream_session_id(&self) -> &str {
        &self.upstream_session_id
    }
}

impl Session for VerificationSession {
    const PARTITION: &'static str = "VERIFICATION";

    fn harness_session_id(&self) -> &str {
        &self.harness_session_id
    }

    fn upstream_session_id(&self) -> &str {
        &self.upstream_session_id
    }
}

/// Outcome of a conditional insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Inserted {
    /// The record was stored.
    Created,

    /// A record with the same harness session id already exists. Nothing was
    /// stored.
    Exists,
}

/// The `SessionStore` trait is implemented to persist issuance and
/// verification sessions.
pub trait SessionStore: Send + Sync {
    /// Store `session` unless a record with the same harness session id
    /// already exists. The check and the write must be a single atomic step.
    fn insert<S: Session>(&self, session: &S) -> impl Future<Output = Result<Inserted>> + Send;

    /// Retrieve a session by its harness session id.
    fn get<S: Session>(
        &self, harness_session_id: &str,
    ) -> impl Future<Output = Result<Option<S>>> + Send;

    /// Retrieve a session by its upstream session id.
    fn find<S: Session>(
        &self, upstream_session_id: &str,
    ) -> impl Future<Output = Result<Option<S>>> + Send;

    /// Overwrite the session with the same harness session id.
    fn update<S: Session>(&self, session: &S) -> impl Future<Output = Result<()>> + Send;
}

/// The credential catalog lists the credential types the façade can offer.
pub trait Catalog: Send + Sync {
    /// The definition for `credential_type`, or `None` when the catalog does
    /// not hold it.
    fn credential(
        &self, credential_type: &str,
    ) -> impl Future<Output = Result<Option<CredentialDefinition>>> + Send;

    /// Optional data mapping to embed in the issuance payload for
    /// `credential_type`.
    fn mapping(&self, credential_type: &str) -> impl Future<Output = Result<Option<Value>>> + Send;
}

/// The upstream credential issuer.
///
/// Implementations should return [`crate::Error::Upstream`] (wrapped in
/// `anyhow`) when the issuer answers with a non-success status.
pub trait IssuerService: Send + Sync {
    /// Ask the issuer to mint a credential offer. Returns the offer URI.
    fn issue(
        &self, format: CredentialFormat, payload: &Value,
    ) -> impl Future<Output = Result<String>> + Send;

    /// Fetch the credential offer identified by `id`.
    fn credential_offer(&self, id: &str) -> impl Future<Output = Result<Value>> + Send;

    /// Forward a credential request.
    fn credential(
        &self, headers: &HeaderMap, body: &str,
    ) -> impl Future<Output = Result<UpstreamResponse>> + Send;

    /// Fetch the issuer's `.well-known/openid-credential-issuer` metadata.
    fn metadata(&self) -> impl Future<Output = Result<Value>> + Send;
}

/// Redirect targets handed to the upstream verifier. Each URI contains a
/// `$id` placeholder the verifier replaces with its session id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationRequest {
    /// Credential type to request from the wallet.
    pub credential_type: String,

    /// Redirect used when the wallet completes verification.
    pub success_redirect_uri: String,

    /// Redirect used when verification fails.
    pub error_redirect_uri: String,
}

/// The upstream verifier.
pub trait VerifierService: Send + Sync {
    /// Ask the verifier to create a verification request. Returns the
    /// verification URI.
    fn verify(&self, request: &VerificationRequest) -> impl Future<Output = Result<String>> + Send;
}
