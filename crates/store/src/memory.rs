use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::errors::StoreError;
use crate::port::{run_query, DocumentStore, Filter, PageRequest, QueryResults, TypeMap};

/// In-memory document store. Documents live in a per-type `BTreeMap` keyed by
/// id, which gives queries a stable ordering for pagination.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<RwLock<TypeMap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn query(
        &self,
        type_name: &str,
        filter: &Filter,
        page: &PageRequest,
    ) -> Result<QueryResults, StoreError> {
        let types = self.inner.read().await;
        run_query(&types, type_name, filter, page)
    }

    async fn get(&self, type_name: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let types = self.inner.read().await;
        Ok(types
            .get(type_name)
            .and_then(|docs| docs.get(id))
            .cloned())
    }

    async fn create(&self, type_name: &str, id: &str, doc: Value) -> Result<Value, StoreError> {
        let mut types = self.inner.write().await;
        let docs = types.entry(type_name.to_string()).or_default();
        if docs.contains_key(id) {
            return Err(StoreError::Conflict(id.to_string()));
        }
        docs.insert(id.to_string(), doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        type_name: &str,
        id: &str,
        doc: Value,
    ) -> Result<Option<Value>, StoreError> {
        let mut types = self.inner.write().await;
        let docs = match types.get_mut(type_name) {
            Some(docs) => docs,
            None => return Ok(None),
        };
        if !docs.contains_key(id) {
            return Ok(None);
        }
        docs.insert(id.to_string(), doc.clone());
        Ok(Some(doc))
    }

    async fn delete(&self, type_name: &str, id: &str) -> Result<bool, StoreError> {
        let mut types = self.inner.write().await;
        Ok(types
            .get_mut(type_name)
            .map(|docs| docs.remove(id).is_some())
            .unwrap_or(false))
    }
}
