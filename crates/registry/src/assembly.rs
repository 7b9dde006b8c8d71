use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use api::{Api, ApiBuilder, RegistrationError};
use configs::{AppConfig, StoreKind, StoreSettings};
use store::{DocumentStore, JsonFileStore, MemoryStore};

use crate::job_profile::JobProfile;
use crate::service::Service;

/// Application name shared by every hosting environment's adapter.
pub const APP_NAME: &str = "service-registry-api-handler";

/// Assemble the registry api over a ready store. Registration failures are
/// startup-fatal and should abort the host's cold start.
pub fn build_api(
    store: Arc<dyn DocumentStore>,
    public_url: Option<String>,
) -> Result<Api, RegistrationError> {
    let mut builder = ApiBuilder::new(APP_NAME);
    if let Some(url) = public_url {
        builder = builder.public_url(url);
    }
    Ok(builder
        .add_default_routes::<Service>()?
        .add_default_routes::<JobProfile>()?
        .build(store))
}

/// Build the configured store collaborator.
pub async fn build_store(settings: &StoreSettings) -> Result<Arc<dyn DocumentStore>> {
    let store: Arc<dyn DocumentStore> = match settings.kind {
        StoreKind::Memory => Arc::new(MemoryStore::new()),
        StoreKind::File => {
            let path = settings
                .path
                .clone()
                .ok_or_else(|| anyhow::anyhow!("store.path is required for the file store"))?;
            Arc::new(JsonFileStore::new(path).await?)
        }
    };
    Ok(store)
}

/// Full assembly from configuration, the way a host's cold start calls it.
pub async fn from_config(mut cfg: AppConfig) -> Result<Api> {
    dotenvy::dotenv().ok();
    cfg.normalize_and_validate()?;
    let store = build_store(&cfg.store).await?;
    let api = build_api(store, cfg.api.public_url.clone())?;
    info!(app = APP_NAME, routes = api.route_count(), "service registry api assembled");
    Ok(api)
}
