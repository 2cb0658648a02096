//! # Issuer Identity
//!
//! Resolves the DID and signing key the upstream issuer should use for a
//! named credential issuer.

use std::future::Future;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// DID and signing key for a credential issuer.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct IssuerIdentity {
    /// The issuer's DID.
    pub did: String,

    /// The issuer's signing key as a JWK.
    pub jwk: Value,
}

/// Resolves issuer identities by issuer name.
pub trait IssuerRegistry: Send + Sync {
    /// Resolve the identity of the issuer named `name`. Returns `None` when
    /// the issuer is unknown.
    fn resolve_issuer_identity(
        &self, name: &str,
    ) -> impl Future<Output = Result<Option<IssuerIdentity>>> + Send;
}

/// A fixed issuer registry.
///
/// Stands in for a DID registry until one is available. Holds a single
/// `did:key` identity for "InfoCert".
#[derive(Clone, Debug)]
pub struct StaticRegistry {
    entries: Vec<(String, IssuerIdentity)>,
}

impl Default for StaticRegistry {
    fn default() -> Self {
        let infocert = IssuerIdentity {
            did: "did:key:z6MkpM3yxNHfzRi9Ew4jsuNMqvtt3wzwPa91uLXzSWH73cG9".to_string(),
            jwk: json!({
                "kty": "OKP",
                "d": "QHew5n38fdxHCREcEQ9n8P-qVSni7rc2OsOJvhIhNKI",
                "crv": "Ed25519",
                "kid": "HAbI4fbhU4v2qjB8LOXFF5yNlalkXmj2yu-0X6GcGCQ",
                "x": "kv2-ve0SCubNAdQw75AtEQ_oikElpaWkE1m5PDSV2Mo"
            }),
        };
        Self {
            entries: vec![("InfoCert".to_string(), infocert)],
        }
    }
}

impl StaticRegistry {
    /// Create a registry holding the default entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the identity for `name`.
    #[must_use]
    pub fn with_issuer(mut self, name: impl Into<String>, identity: IssuerIdentity) -> Self {
        let name = name.into();
        self.entries.retain(|(n, _)| *n != name);
        self.entries.push((name, identity));
        self
    }

    /// Look up an identity by issuer name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&IssuerIdentity> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, identity)| identity)
    }
}

impl IssuerRegistry for StaticRegistry {
    async fn resolve_issuer_identity(&self, name: &str) -> Result<Option<IssuerIdentity>> {
        Ok(self.get(name).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        let registry = StaticRegistry::new();
        let identity = registry.get("InfoCert").expect("should have InfoCert");
        assert!(identity.did.starts_with("did:key:"));
        assert_eq!(identity.jwk["crv"], "Ed25519");
        assert!(registry.get("Unknown").is_none());
    }

    #[test]
    fn with_issuer() {
        let identity = IssuerIdentity {
            did: "did:example:123".to_string(),
            jwk: json!({"kty": "OKP"}),
        };
        let registry = StaticRegistry::new().with_issuer("Example", identity.clone());
        assert_eq!(registry.get("Example"), Some(&identity));
        assert!(registry.get("InfoCert").is_some());
    }
}
