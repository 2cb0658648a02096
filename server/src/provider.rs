//! # Server Provider
//!
//! Wires the upstream HTTP client, the in-memory session store and the
//! static issuer registry into a single [`Provider`](credibil_facade::provider::Provider).

use anyhow::Result;
use credibil_facade::identity::{IssuerIdentity, IssuerRegistry, StaticRegistry};
use credibil_facade::provider::{
    Catalog, Inserted, IssuerService, Session, SessionStore, VerificationRequest, VerifierService,
};
use credibil_facade::{
    Config, CredentialDefinition, CredentialFormat, HttpUpstream, UpstreamResponse,
};
use http::HeaderMap;
use serde_json::Value;

use crate::store::MemoryStore;

/// The provider used by the façade server.
#[derive(Clone, Debug)]
pub struct ServerProvider {
    upstream: HttpUpstream,
    store: MemoryStore,
    registry: StaticRegistry,
}

impl ServerProvider {
    /// Create a provider for the upstream services named in `config`.
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            upstream: HttpUpstream::new(config),
            store: MemoryStore::new(),
            registry: StaticRegistry::new(),
        }
    }
}

impl SessionStore for ServerProvider {
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

impl Catalog for ServerProvider {
    async fn credential(&self, credential_type: &str) -> Result<Option<CredentialDefinition>> {
        Catalog::credential(&self.upstream, credential_type).await
    }

    async fn mapping(&self, credential_type: &str) -> Result<Option<Value>> {
        self.upstream.mapping(credential_type).await
    }
}

impl IssuerService for ServerProvider {
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

impl VerifierService for ServerProvider {
    async fn verify(&self, request: &VerificationRequest) -> Result<String> {
        self.upstream.verify(request).await
    }
}

impl IssuerRegistry for ServerProvider {
    async fn resolve_issuer_identity(&self, name: &str) -> Result<Option<IssuerIdentity>> {
        self.registry.resolve_issuer_identity(name).await
    }
}
