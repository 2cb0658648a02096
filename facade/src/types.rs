//! # Types
//!
//! Request and response types for the façade's harness, proxy and callback
//! endpoints, together with the session records tracked for each flow.

use std::fmt::{self, Display};
use std::str::FromStr;

use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ----------------------------------------------------------------------------
// Sessions
// ----------------------------------------------------------------------------

/// Issuance session lifecycle.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum IssuanceState {
    /// The offer has been created but not yet fetched by a wallet.
    #[default]
    Pending,

    /// A wallet has fetched the offer.
    Read,
}

/// Verification session lifecycle.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum VerificationState {
    /// The verification request has been created.
    #[default]
    Pending,

    /// The wallet completed verification.
    Completed,

    /// Verification failed.
    Failed,
}

impl Display for VerificationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "Pending"),
            Self::Completed => write!(f, "Completed"),
            Self::Failed => write!(f, "Failed"),
        }
    }
}

impl FromStr for VerificationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Completed" => Ok(Self::Completed),
            "Failed" => Ok(Self::Failed),
            _ => Err(format!("unknown verification state: {s}")),
        }
    }
}

/// A credential issuance session.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceSession {
    /// Session id assigned by the test harness.
    pub harness_session_id: String,

    /// Session id assigned by the upstream issuer (the offer's `id`).
    pub upstream_session_id: String,

    /// Current state.
    pub state: IssuanceState,
}

/// A credential verification session.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerificationSession {
    /// Session id assigned by the test harness.
    pub harness_session_id: String,

    /// Session id assigned by the upstream verifier (the request's `state`).
    pub upstream_session_id: String,

    /// Current state.
    pub state: VerificationState,

    /// Reserved for verified claims. Always empty for now.
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

// ----------------------------------------------------------------------------
// Credential catalog
// ----------------------------------------------------------------------------

/// Credential formats the upstream issuer can issue.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum CredentialFormat {
    /// JWT-secured W3C Verifiable Credential.
    #[serde(rename = "JWT + VCDM")]
    JwtVcdm,

    /// SD-JWT W3C Verifiable Credential with selectively disclosable claims.
    #[default]
    #[serde(rename = "SD-JWT + VCDM")]
    SdJwtVcdm,
}

impl CredentialFormat {
    /// Path segment of the upstream issuer's issuance endpoint.
    #[must_use]
    pub const fn issue_path(self) -> &'static str {
        match self {
            Self::JwtVcdm => "jwt",
            Self::SdJwtVcdm => "sdjwt",
        }
    }
}

/// The issuer named by a catalog credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CatalogIssuer {
    /// Issuer name, used to resolve the issuer's DID and signing key.
    pub name: String,
}

/// A credential definition from the credential catalog.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CredentialDefinition {
    /// Credential type identifier, as used by the harness.
    pub id: String,

    /// Human-readable title.
    pub title: String,

    /// The issuer of the credential.
    pub issuer: CatalogIssuer,

    /// Format the credential is issued in.
    pub selected_format: CredentialFormat,

    /// The credential template sent to the upstream issuer.
    pub offer: Value,
}

// ----------------------------------------------------------------------------
// Harness endpoints
// ----------------------------------------------------------------------------

/// Request a credential offer for the harness.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueRequest {
    /// Harness session id.
    pub session_id: Option<String>,

    /// Credential type to offer.
    pub credential_type: Option<String>,
}

/// A credential offer ready for a wallet.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct IssueResponse {
    /// PNG data URL of a QR code encoding `credential_offer_uri`.
    pub qr: String,

    /// Harness session id.
    pub session_id: String,

    /// Offer URI rewritten to point at the façade.
    pub credential_offer_uri: String,
}

/// Request a verification for the harness.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    /// Harness session id.
    pub session_id: Option<String>,

    /// Credential type to request from the wallet.
    pub credential_type: Option<String>,
}

/// A verification request ready for a wallet.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    /// PNG data URL of a QR code encoding `verification_uri`.
    pub qr: String,

    /// Harness session id.
    pub session_id: String,

    /// Verification URI returned by the upstream verifier.
    pub verification_uri: String,
}

/// Query the state of an issuance session.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueStatusRequest {
    /// Harness session id.
    pub session_id: Option<String>,
}

/// Query the state of a verification session.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyStatusRequest {
    /// Harness session id.
    pub session_id: Option<String>,
}

/// Current state of a session.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse<S> {
    /// Always `"OK"`.
    pub message: String,

    /// Harness session id.
    pub session_id: String,

    /// Session state.
    pub status: S,
}

impl<S> StatusResponse<S> {
    pub(crate) fn ok(session_id: impl Into<String>, status: S) -> Self {
        Self {
            message: "OK".to_string(),
            session_id: session_id.into(),
            status,
        }
    }
}

/// Issuance session status.
pub type IssueStatusResponse = StatusResponse<IssuanceState>;

/// Verification session status.
pub type VerifyStatusResponse = StatusResponse<VerificationState>;

/// Update the state of a verification session, keyed by the upstream
/// verifier's session id.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct UpdateStatusRequest {
    /// Upstream session id.
    pub id: Option<String>,

    /// New state (`"Pending"`, `"Completed"` or `"Failed"`).
    pub state: Option<String>,
}

/// Update confirmation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct UpdateStatusResponse {
    /// Always `"Update successful"`.
    pub message: String,
}

// ----------------------------------------------------------------------------
// Proxy endpoints
// ----------------------------------------------------------------------------

/// Fetch a credential offer from the upstream issuer on behalf of a wallet.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct OfferRequest {
    /// Upstream session (offer) id.
    pub id: Option<String>,
}

/// Forward a credential request to the upstream issuer. Headers travel with
/// the request as [`crate::api::ForwardHeaders`].
#[derive(Clone, Debug, Default)]
pub struct CredentialRequest {
    /// The raw request body.
    pub body: String,
}

/// Fetch the upstream issuer's metadata.
#[derive(Clone, Debug, Default)]
pub struct MetadataRequest;

/// An upstream response relayed verbatim.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpstreamResponse {
    /// Upstream HTTP status.
    pub status: StatusCode,

    /// Upstream JSON body.
    pub body: Value,
}
