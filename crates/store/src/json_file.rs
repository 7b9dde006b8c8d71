use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::{fs, sync::RwLock};
use tracing::debug;

use crate::errors::StoreError;
use crate::port::{run_query, DocumentStore, Filter, PageRequest, QueryResults, TypeMap};

/// JSON file-backed document store.
///
/// Persists the whole per-type document map to one JSON file and rewrites it
/// after every mutation. Intended for single-process deployments where a
/// database is overkill; IO failures surface as `StoreError::Unavailable`.
#[derive(Clone)]
pub struct JsonFileStore {
    inner: Arc<RwLock<TypeMap>>,
    file_path: PathBuf,
}

impl JsonFileStore {
    /// Initialize the store from a path. Creates the file with an empty map
    /// if missing.
    pub async fn new<P: Into<PathBuf>>(path: P) -> Result<Self, StoreError> {
        let file_path = path.into();
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).await.ok();
        }

        let types: TypeMap = match fs::read(&file_path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).unwrap_or_default(),
            Err(_) => {
                let empty = TypeMap::default();
                let bytes = serde_json::to_vec(&empty)
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                fs::write(&file_path, bytes)
                    .await
                    .map_err(|e| StoreError::Unavailable(e.to_string()))?;
                empty
            }
        };

        debug!(path = %file_path.display(), types = types.len(), "loaded document store file");
        Ok(Self {
            inner: Arc::new(RwLock::new(types)),
            file_path,
        })
    }

    async fn save(&self) -> Result<(), StoreError> {
        let types = self.inner.read().await;
        let bytes =
            serde_json::to_vec(&*types).map_err(|e| StoreError::Unavailable(e.to_string()))?;
        fs::write(&self.file_path, bytes)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
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
        {
            let mut types = self.inner.write().await;
            let docs = types.entry(type_name.to_string()).or_default();
            if docs.contains_key(id) {
                return Err(StoreError::Conflict(id.to_string()));
            }
            docs.insert(id.to_string(), doc.clone());
        }
        self.save().await?;
        Ok(doc)
    }

    async fn update(
        &self,
        type_name: &str,
        id: &str,
        doc: Value,
    ) -> Result<Option<Value>, StoreError> {
        {
            let mut types = self.inner.write().await;
            let docs = match types.get_mut(type_name) {
                Some(docs) => docs,
                None => return Ok(None),
            };
            if !docs.contains_key(id) {
                return Ok(None);
            }
            docs.insert(id.to_string(), doc.clone());
        }
        self.save().await?;
        Ok(Some(doc))
    }

    async fn delete(&self, type_name: &str, id: &str) -> Result<bool, StoreError> {
        let existed = {
            let mut types = self.inner.write().await;
            types
                .get_mut(type_name)
                .map(|docs| docs.remove(id).is_some())
                .unwrap_or(false)
        };
        if existed {
            self.save().await?;
        }
        Ok(existed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("registry_store_{}.json", uuid::Uuid::new_v4()))
    }

    #[tokio::test]
    async fn crud_persists_across_reload() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let store = JsonFileStore::new(&path).await?;

        store
            .create("Service", "a", json!({"id": "a", "name": "Encoder"}))
            .await?;
        store
            .create("JobProfile", "p", json!({"id": "p", "name": "Transcode"}))
            .await?;
        store
            .update("Service", "a", json!({"id": "a", "name": "Decoder"}))
            .await?;

        // a fresh store over the same file sees the same documents
        let reloaded = JsonFileStore::new(&path).await?;
        let service = reloaded.get("Service", "a").await?.unwrap();
        assert_eq!(service["name"], "Decoder");
        assert!(reloaded.get("JobProfile", "p").await?.is_some());

        assert!(reloaded.delete("JobProfile", "p").await?);
        let reloaded_again = JsonFileStore::new(&path).await?;
        assert!(reloaded_again.get("JobProfile", "p").await?.is_none());

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_create_leaves_file_untouched() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let store = JsonFileStore::new(&path).await?;
        store.create("Service", "a", json!({"id": "a", "v": 1})).await?;
        let err = store.create("Service", "a", json!({"id": "a", "v": 2})).await;
        assert!(matches!(err, Err(StoreError::Conflict(_))));

        let reloaded = JsonFileStore::new(&path).await?;
        assert_eq!(reloaded.get("Service", "a").await?.unwrap()["v"], 1);

        let _ = fs::remove_file(&path).await;
        Ok(())
    }

    #[tokio::test]
    async fn query_runs_against_loaded_file() -> Result<(), anyhow::Error> {
        let path = temp_path();
        let store = JsonFileStore::new(&path).await?;
        store.create("Service", "a", json!({"id": "a", "name": "Encoder"})).await?;
        store.create("Service", "b", json!({"id": "b", "name": "Decoder"})).await?;

        let reloaded = JsonFileStore::new(&path).await?;
        let results = reloaded
            .query(
                "Service",
                &Filter::new().term("name", "Encoder"),
                &PageRequest::default(),
            )
            .await?;
        assert_eq!(results.items.len(), 1);
        assert_eq!(results.items[0]["id"], "a");

        let _ = fs::remove_file(&path).await;
        Ok(())
    }
}
