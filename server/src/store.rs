//! # In-Memory Session Store
//!
//! Sessions live for the lifetime of the process. Nothing is ever removed, so
//! memory grows with every session, and nothing survives a restart. This
//! store is neither persistent nor bounded.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use credibil_facade::provider::{Inserted, Session, SessionStore};
use serde_json::Value;
use tokio::sync::RwLock;

type Key = (&'static str, String);

#[derive(Debug, Default)]
struct Partitions {
    // (partition, harness session id) -> session
    sessions: HashMap<Key, Value>,
    // (partition, upstream session id) -> harness session id
    upstream_ids: HashMap<Key, String>,
}

/// A [`SessionStore`] holding sessions in memory.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    partitions: Arc<RwLock<Partitions>>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    async fn insert<S: Session>(&self, session: &S) -> Result<Inserted> {
        let key = (S::PARTITION, session.harness_session_id().to_string());
        let value = serde_json::to_value(session)?;

        let mut partitions = self.partitions.write().await;
        if partitions.sessions.contains_key(&key) {
            return Ok(Inserted::Exists);
        }
        partitions.sessions.insert(key, value);
        partitions.upstream_ids.insert(
            (S::PARTITION, session.upstream_session_id().to_string()),
            session.harness_session_id().to_string(),
        );
        drop(partitions);

        Ok(Inserted::Created)
    }

    async fn get<S: Session>(&self, harness_session_id: &str) -> Result<Option<S>> {
        let key = (S::PARTITION, harness_session_id.to_string());
        let partitions = self.partitions.read().await;
        let Some(value) = partitions.sessions.get(&key) else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(value.clone())?))
    }

    async fn find<S: Session>(&self, upstream_session_id: &str) -> Result<Option<S>> {
        let key = (S::PARTITION, upstream_session_id.to_string());
        let partitions = self.partitions.read().await;
        let Some(harness_session_id) = partitions.upstream_ids.get(&key) else {
            return Ok(None);
        };
        let Some(value) = partitions.sessions.get(&(S::PARTITION, harness_session_id.clone()))
        else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_value(value.clone())?))
    }

    async fn update<S: Session>(&self, session: &S) -> Result<()> {
        let key = (S::PARTITION, session.harness_session_id().to_string());
        let value = serde_json::to_value(session)?;
        self.partitions.write().await.sessions.insert(key, value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use credibil_facade::{IssuanceSession, IssuanceState, VerificationSession, VerificationState};

    use super::*;

    fn issuance(harness: &str, upstream: &str) -> IssuanceSession {
        IssuanceSession {
            harness_session_id: harness.to_string(),
            upstream_session_id: upstream.to_string(),
            state: IssuanceState::Pending,
        }
    }

    #[tokio::test]
    async fn conditional_insert() {
        let store = MemoryStore::new();

        let inserted = store.insert(&issuance("s1", "offer-1")).await.unwrap();
        assert_eq!(inserted, Inserted::Created);
        let inserted = store.insert(&issuance("s1", "offer-2")).await.unwrap();
        assert_eq!(inserted, Inserted::Exists);

        // the first record is kept
        let session: IssuanceSession = store.get("s1").await.unwrap().unwrap();
        assert_eq!(session.upstream_session_id, "offer-1");
        assert!(store.find::<IssuanceSession>("offer-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn find_and_update() {
        let store = MemoryStore::new();
        store.insert(&issuance("s1", "offer-1")).await.unwrap();

        let mut session: IssuanceSession = store.find("offer-1").await.unwrap().unwrap();
        session.state = IssuanceState::Read;
        store.update(&session).await.unwrap();

        let session: IssuanceSession = store.get("s1").await.unwrap().unwrap();
        assert_eq!(session.state, IssuanceState::Read);
    }

    // Issuance and verification sessions may share a harness session id.
    #[tokio::test]
    async fn partitioned() {
        let store = MemoryStore::new();
        store.insert(&issuance("shared", "offer-1")).await.unwrap();

        let verification = VerificationSession {
            harness_session_id: "shared".to_string(),
            upstream_session_id: "state-1".to_string(),
            state: VerificationState::Pending,
            attributes: serde_json::Map::new(),
        };
        let inserted = store.insert(&verification).await.unwrap();
        assert_eq!(inserted, Inserted::Created);

        assert!(store.get::<VerificationSession>("shared").await.unwrap().is_some());
        assert!(store.find::<VerificationSession>("offer-1").await.unwrap().is_none());
    }
}
