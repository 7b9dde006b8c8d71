use anyhow::{anyhow, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub store: StoreSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ApiSettings {
    /// Absolute base url prefixed onto generated Location headers.
    #[serde(default)]
    pub public_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    Memory,
    File,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_store_kind")]
    pub kind: StoreKind,
    /// Backing file for the `file` store kind.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            kind: StoreKind::Memory,
            path: None,
        }
    }
}

fn default_store_kind() -> StoreKind {
    StoreKind::Memory
}

/// Load from `CONFIG_PATH` (default `config.toml`); a missing file yields the
/// defaults so a bare process still boots.
pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(_) => Ok(AppConfig::default()),
    }
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    let cfg: AppConfig = toml::from_str(&content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.api.normalize_from_env();
        self.store.normalize_from_env();
        self.store.validate()?;
        Ok(())
    }
}

impl ApiSettings {
    pub fn normalize_from_env(&mut self) {
        if self.public_url.is_none() {
            if let Ok(url) = std::env::var("REGISTRY_PUBLIC_URL") {
                self.public_url = Some(url);
            }
        }
        // a trailing slash would double up in generated paths
        if let Some(url) = &mut self.public_url {
            while url.ends_with('/') {
                url.pop();
            }
        }
    }
}

impl StoreSettings {
    pub fn normalize_from_env(&mut self) {
        if let Ok(kind) = std::env::var("REGISTRY_STORE_KIND") {
            match kind.to_ascii_lowercase().as_str() {
                "memory" => self.kind = StoreKind::Memory,
                "file" => self.kind = StoreKind::File,
                _ => {}
            }
        }
        if self.path.is_none() {
            if let Ok(path) = std::env::var("REGISTRY_STORE_PATH") {
                self.path = Some(path);
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.kind == StoreKind::File {
            let path_ok = self
                .path
                .as_ref()
                .map(|p| !p.trim().is_empty())
                .unwrap_or(false);
            if !path_ok {
                return Err(anyhow!(
                    "store.path is required when store.kind is \"file\""
                ));
            }
        }
        Ok(())
    }
}
