//! # Upstream Client
//!
//! [`HttpUpstream`] implements the credential catalog, issuer and verifier
//! provider traits over HTTP using `reqwest`. TLS certificates are always
//! validated.

use anyhow::{Context, Result, anyhow};
use http::header::{
    ACCEPT_ENCODING, CONNECTION, CONTENT_LENGTH, HOST, PROXY_AUTHENTICATE, PROXY_AUTHORIZATION, TE,
    TRAILER, TRANSFER_ENCODING, UPGRADE,
};
use http::{HeaderMap, HeaderName};
use reqwest::{Client, Response};
use serde_json::{Value, json};

use crate::config::Config;
use crate::error::Error;
use crate::provider::{Catalog, IssuerService, VerificationRequest, VerifierService};
use crate::types::{CatalogIssuer, CredentialDefinition, CredentialFormat, UpstreamResponse};

// Headers describing the inbound connection rather than the request.
// `Accept-Encoding` is left to reqwest, which only reads identity bodies.
const NOT_FORWARDED: [HeaderName; 10] = [
    HOST,
    CONTENT_LENGTH,
    CONNECTION,
    TRANSFER_ENCODING,
    UPGRADE,
    TE,
    TRAILER,
    PROXY_AUTHORIZATION,
    PROXY_AUTHENTICATE,
    ACCEPT_ENCODING,
];

/// HTTP client for the upstream issuer, verifier and credential catalog.
#[derive(Clone, Debug)]
pub struct HttpUpstream {
    http: Client,
    issuer_url: String,
    verifier_url: String,
    vc_repo_url: String,
}

impl HttpUpstream {
    /// Create a client for the upstream services named in `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client using a preconfigured `reqwest` client.
    #[must_use]
    pub fn with_client(http: Client, config: &Config) -> Self {
        Self {
            http,
            issuer_url: config.issuer_url.clone(),
            verifier_url: config.verifier_url.clone(),
            vc_repo_url: config.vc_repo_url.clone(),
        }
    }

    async fn get_json(&self, url: &str) -> Result<Value> {
        tracing::debug!("GET {url}");
        let resp = self.http.get(url).send().await.with_context(|| format!("fetching {url}"))?;
        let resp = success(resp)?;
        resp.json::<Value>().await.with_context(|| format!("deserializing {url}"))
    }
}

// Map a non-success upstream status to `Error::Upstream`.
fn success(resp: Response) -> Result<Response> {
    let status = resp.status();
    if !status.is_success() {
        tracing::warn!("{} returned {status}", resp.url());
        return Err(Error::Upstream(format!("HTTP error! Status: {}", status.as_u16())).into());
    }
    Ok(resp)
}

impl Catalog for HttpUpstream {
    async fn credential(&self, credential_type: &str) -> Result<Option<CredentialDefinition>> {
        let list = self.get_json(&format!("{}/api/list", self.vc_repo_url)).await?;
        let names: Vec<String> =
            serde_json::from_value(list).context("credential list is not an array of names")?;
        if !names.iter().any(|n| n == credential_type) {
            return Ok(None);
        }

        let offer = self.get_json(&format!("{}/api/vc/{credential_type}", self.vc_repo_url)).await?;
        let title = offer
            .pointer("/type/1")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("credential {credential_type} has no type"))?
            .to_string();
        let issuer_name = offer
            .pointer("/issuer/name")
            .and_then(Value::as_str)
            .ok_or_else(|| anyhow!("credential {credential_type} has no issuer name"))?
            .to_string();

        Ok(Some(CredentialDefinition {
            id: credential_type.to_string(),
            title,
            issuer: CatalogIssuer { name: issuer_name },
            selected_format: CredentialFormat::SdJwtVcdm,
            offer,
        }))
    }

    async fn mapping(&self, credential_type: &str) -> Result<Option<Value>> {
        let url = format!("{}/api/mapping/{credential_type}", self.vc_repo_url);
        tracing::debug!("GET {url}");
        let resp = self.http.get(&url).send().await.context("failed to fetch mapping")?;

        // not every credential has a mapping
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let mapping =
            success(resp)?.json::<Value>().await.context("failed to deserialize mapping")?;
        Ok(Some(mapping).filter(|m| !m.is_null()))
    }
}

impl IssuerService for HttpUpstream {
    async fn issue(&self, format: CredentialFormat, payload: &Value) -> Result<String> {
        let url = format!("{}/openid4vc/{}/issue", self.issuer_url, format.issue_path());
        tracing::debug!("POST {url}");
        let resp = self.http.post(&url).json(payload).send().await.context("issuing offer")?;
        success(resp)?.text().await.context("reading offer URI")
    }

    async fn credential_offer(&self, id: &str) -> Result<Value> {
        let url = reqwest::Url::parse_with_params(
            &format!("{}/openid4vc/credentialOffer", self.issuer_url),
            [("id", id)],
        )?;
        self.get_json(url.as_str()).await
    }

    async fn credential(&self, headers: &HeaderMap, body: &str) -> Result<UpstreamResponse> {
        let url = format!("{}/credential", self.issuer_url);

        let mut forwarded = headers.clone();
        for name in &NOT_FORWARDED {
            forwarded.remove(name);
        }
        forwarded.remove("keep-alive");

        tracing::debug!("POST {url}");
        let resp = self
            .http
            .post(&url)
            .headers(forwarded)
            .body(body.to_string())
            .send()
            .await
            .context("forwarding credential request")?;
        let resp = success(resp)?;
        let status = resp.status();
        let body = resp.json::<Value>().await.context("deserializing credential response")?;

        Ok(UpstreamResponse { status, body })
    }

    async fn metadata(&self) -> Result<Value> {
        self.get_json(&format!("{}/.well-known/openid-credential-issuer", self.issuer_url)).await
    }
}

impl VerifierService for HttpUpstream {
    async fn verify(&self, request: &VerificationRequest) -> Result<String> {
        let url = format!("{}/openid4vc/verify", self.verifier_url);
        tracing::debug!("POST {url}");
        let resp = self
            .http
            .post(&url)
            .header("successRedirectUri", &request.success_redirect_uri)
            .header("errorRedirectUri", &request.error_redirect_uri)
            .json(&json!({"request_credentials": [request.credential_type]}))
            .send()
            .await
            .context("requesting verification")?;
        success(resp)?.text().await.context("reading verification URI")
    }
}
