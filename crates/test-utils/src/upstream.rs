//! # Mock Upstream Services
//!
//! Stands in for the credential catalog, the upstream issuer and the
//! upstream verifier.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use credibil_facade::Error;
use credibil_facade::provider::{Catalog, IssuerService, VerificationRequest, VerifierService};
use credibil_facade::types::{CredentialDefinition, CredentialFormat, UpstreamResponse};
use http::header::AUTHORIZATION;
use http::{HeaderMap, StatusCode};
use serde_json::{Value, json};
use url::form_urlencoded;

pub const ISSUER_URL: &str = "https://issuer.example";
pub const VERIFIER_URL: &str = "https://verifier.example";

// The mock issuer refuses to issue this credential type.
const UNAVAILABLE: &str = "UnavailableCredential";

pub mod data {
    pub const CATALOG: &[u8] = include_bytes!("../data/catalog.json");
    pub const MAPPINGS: &[u8] = include_bytes!("../data/mappings.json");
}

/// A payload received by the mock issuer.
#[derive(Clone, Debug)]
pub struct Issued {
    pub format: CredentialFormat,
    pub payload: Value,
    pub offer_id: String,
}

#[derive(Clone, Debug)]
pub struct MockUpstream {
    catalog: Arc<HashMap<String, CredentialDefinition>>,
    mappings: Arc<HashMap<String, Value>>,
    issued: Arc<Mutex<Vec<Issued>>>,
    verifications: Arc<Mutex<Vec<(VerificationRequest, String)>>>,
}

impl MockUpstream {
    #[must_use]
    pub fn new() -> Self {
        let catalog: HashMap<String, CredentialDefinition> =
            serde_json::from_slice(data::CATALOG).expect("should deserialize");
        let mappings: HashMap<String, Value> =
            serde_json::from_slice(data::MAPPINGS).expect("should deserialize");

        Self {
            catalog: Arc::new(catalog),
            mappings: Arc::new(mappings),
            issued: Arc::new(Mutex::new(Vec::new())),
            verifications: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Payloads the issuer has received, oldest first.
    pub fn issued(&self) -> Vec<Issued> {
        self.issued.lock().expect("should lock").clone()
    }

    /// Verification requests the verifier has received, with the `state`
    /// assigned to each.
    pub fn verifications(&self) -> Vec<(VerificationRequest, String)> {
        self.verifications.lock().expect("should lock").clone()
    }
}

impl Default for MockUpstream {
    fn default() -> Self {
        Self::new()
    }
}

fn upstream_error(status: StatusCode) -> anyhow::Error {
    Error::Upstream(format!("HTTP error! Status: {}", status.as_u16())).into()
}

/// Build an offer URI the way the upstream issuer does.
pub fn offer_uri(offer_id: &str) -> String {
    let nested = format!("{ISSUER_URL}/openid4vc/credentialOffer?id={offer_id}");
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("credential_offer_uri", &nested)
        .finish();
    format!("openid-credential-offer://issuer.example/?{query}")
}

impl Catalog for MockUpstream {
    async fn credential(&self, credential_type: &str) -> Result<Option<CredentialDefinition>> {
        Ok(self.catalog.get(credential_type).cloned())
    }

    async fn mapping(&self, credential_type: &str) -> Result<Option<Value>> {
        Ok(self.mappings.get(credential_type).cloned())
    }
}

impl IssuerService for MockUpstream {
    async fn issue(&self, format: CredentialFormat, payload: &Value) -> Result<String> {
        let Some(vc_type) = payload.pointer("/vc/type/1").and_then(Value::as_str) else {
            return Err(upstream_error(StatusCode::BAD_REQUEST));
        };
        if vc_type == UNAVAILABLE {
            return Err(upstream_error(StatusCode::SERVICE_UNAVAILABLE));
        }

        let offer_id = uuid::Uuid::new_v4().to_string();
        self.issued.lock().map_err(|_| anyhow!("issue locking"))?.push(Issued {
            format,
            payload: payload.clone(),
            offer_id: offer_id.clone(),
        });
        Ok(offer_uri(&offer_id))
    }

    async fn credential_offer(&self, id: &str) -> Result<Value> {
        let issued = self.issued.lock().map_err(|_| anyhow!("issue locking"))?;
        let Some(issued) = issued.iter().find(|i| i.offer_id == id) else {
            return Err(upstream_error(StatusCode::NOT_FOUND));
        };
        let vc_type = issued.payload.pointer("/vc/type/1").cloned().unwrap_or_default();

        Ok(json!({
            "credential_issuer": ISSUER_URL,
            "credential_configuration_ids": [vc_type],
            "grants": {
                "urn:ietf:params:oauth:grant-type:pre-authorized_code": {
                    "pre-authorized_code": format!("code-{id}")
                }
            }
        }))
    }

    async fn credential(&self, headers: &HeaderMap, body: &str) -> Result<UpstreamResponse> {
        let Some(authorization) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) else {
            return Err(upstream_error(StatusCode::UNAUTHORIZED));
        };
        let Ok(request) = serde_json::from_str::<Value>(body) else {
            return Err(upstream_error(StatusCode::BAD_REQUEST));
        };

        Ok(UpstreamResponse {
            status: StatusCode::OK,
            body: json!({
                "credential": "eyJhbGciOiJFZERTQSJ9.mock.credential",
                "authorization": authorization,
                "request": request,
            }),
        })
    }

    async fn metadata(&self) -> Result<Value> {
        Ok(json!({
            "issuer": ISSUER_URL,
            "credential_issuer": ISSUER_URL,
            "credential_endpoint": format!("{ISSUER_URL}/credential"),
            "credential_configurations_supported": {
                "VerifiableId_vc+sd-jwt": {"format": "vc+sd-jwt"}
            }
        }))
    }
}

impl VerifierService for MockUpstream {
    async fn verify(&self, request: &VerificationRequest) -> Result<String> {
        let state = uuid::Uuid::new_v4().to_string();
        self.verifications
            .lock()
            .map_err(|_| anyhow!("issue locking"))?
            .push((request.clone(), state.clone()));

        let query = form_urlencoded::Serializer::new(String::new())
            .append_pair("response_type", "vp_token")
            .append_pair("client_id", VERIFIER_URL)
            .append_pair("response_mode", "direct_post")
            .append_pair("state", &state)
            .append_pair(
                "presentation_definition_uri",
                &format!("{VERIFIER_URL}/openid4vc/pd/{state}"),
            )
            .finish();
        Ok(format!("openid4vp://authorize?{query}"))
    }
}
