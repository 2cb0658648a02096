//! # Mock Provider
//!
//! A [`Facade`] provider backed by an in-memory session store and mock
//! upstream services.

mod store;
mod upstream;

use anyhow::Result;
use credibil_facade::identity::{IssuerIdentity, IssuerRegistry, StaticRegistry};
use credibil_facade::provider::{
    Catalog, Inserted, IssuerService, Session, SessionStore, VerificationRequest, VerifierService,
};
use credibil_facade::types::{CredentialDefinition, CredentialFormat, UpstreamResponse};
use http::HeaderMap;
use serde_json::Value;

pub use self::store::Mockstore;
pub use self::upstream::{ISSUER_URL, Issued, MockUpstream, VERIFIER_URL, offer_uri};

pub const BASE_URL: &str = "https://facade.example";

#[derive(Clone, Debug, Default)]
pub struct Facade {
    pub store: Mockstore,
    pub upstream: MockUpstream,
    registry: StaticRegistry,
}

impl Facade {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for Facade {
    async fn insert<S: Session>(&self, session: &S) -> Result<Inserted> {
        self.store.insert(session).await
    }

    async fn get<S: Session>(&self, harness_session_id: &str) -> Result<Option<S>> {
        self.store.get(harness_session_id).await
    }

    async fn find<S: Session>(&self, upstream_session_id: &str) -> Result<Option<S>> {
        self.store.find(upstream_session_id).await
    }

    async fn update<S: Session>(&self, session: &S) -> Result<()> {
        self.store.update(session).await
    }
}

impl Catalog for Facade {
    async fn credential(&self, credential_type: &str) -> Result<Option<CredentialDefinition>> {
        Catalog::credential(&self.upstream, credential_type).await
    }

    async fn mapping(&self, credential_type: &str) -> Result<Option<Value>> {
        self.upstream.mapping(credential_type).await
    }
}

impl IssuerService for Facade {
    async fn issue(&self, format: CredentialFormat, payload: &Value) -> Result<String> {
        self.upstream.issue(format, payload).await
    }

    async fn credential_offer(&self, id: &str) -> Result<Value> {
        self.upstream.credential_offer(id).await
    }

    async fn credential(&self, headers: &HeaderMap, body: &str) -> Result<UpstreamResponse> {
        IssuerService::credential(&self.upstream, headers, body).await
    }

    async fn metadata(&self) -> Result<Value> {
        self.upstream.metadata().await
    }
}

impl VerifierService for Facade {
    async fn verify(&self, request: &VerificationRequest) -> Result<String> {
        self.upstream.verify(request).await
    }
}

impl IssuerRegistry for Facade {
    async fn resolve_issuer_identity(&self, name: &str) -> Result<Option<IssuerIdentity>> {
        self.registry.resolve_issuer_identity(name).await
    }
}
