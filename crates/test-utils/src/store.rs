//! # In-Memory Session Store

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};
use credibil_facade::provider::{Inserted, Session, SessionStore};

#[derive(Debug, Default)]
struct Tables {
    // "{partition}-{harness_session_id}" -> serialized session
    records: HashMap<String, Vec<u8>>,
    // "{partition}-{upstream_session_id}" -> harness_session_id
    upstream: HashMap<String, String>,
}

#[derive(Clone, Debug, Default)]
pub struct Mockstore {
    tables: Arc<Mutex<Tables>>,
}

impl Mockstore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of sessions of type `S` held by the store.
    pub fn count<S: Session>(&self) -> usize {
        let prefix = format!("{}-", S::PARTITION);
        let tables = self.tables.lock().expect("should lock");
        tables.records.keys().filter(|k| k.starts_with(&prefix)).count()
    }
}

impl SessionStore for Mockstore {
    async fn insert<S: Session>(&self, session: &S) -> Result<Inserted> {
        let key = format!("{}-{}", S::PARTITION, session.harness_session_id());
        let data = serde_json::to_vec(session)?;

        let mut tables = self.tables.lock().map_err(|_| anyhow!("issue locking"))?;
        if tables.records.contains_key(&key) {
            return Ok(Inserted::Exists);
        }
        tables.records.insert(key, data);
        tables.upstream.insert(
            format!("{}-{}", S::PARTITION, session.upstream_session_id()),
            session.harness_session_id().to_string(),
        );
        Ok(Inserted::Created)
    }

    async fn get<S: Session>(&self, harness_session_id: &str) -> Result<Option<S>> {
        let key = format!("{}-{harness_session_id}", S::PARTITION);
        let tables = self.tables.lock().map_err(|_| anyhow!("issue locking"))?;
        let Some(data) = tables.records.get(&key) else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(data)?))
    }

    async fn find<S: Session>(&self, upstream_session_id: &str) -> Result<Option<S>> {
        let harness_session_id = {
            let tables = self.tables.lock().map_err(|_| anyhow!("issue locking"))?;
            let key = format!("{}-{upstream_session_id}", S::PARTITION);
            let Some(id) = tables.upstream.get(&key) else {
                return Ok(None);
            };
            id.clone()
        };
        SessionStore::get::<S>(self, &harness_session_id).await
    }

    async fn update<S: Session>(&self, session: &S) -> Result<()> {
        let key = format!("{}-{}", S::PARTITION, session.harness_session_id());
        let data = serde_json::to_vec(session)?;
        let mut tables = self.tables.lock().map_err(|_| anyhow!("issue locking"))?;
        tables.records.insert(key, data);
        Ok(())
    }
}
