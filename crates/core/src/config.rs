use crate::models::AdminConfig;
use crate::query::missing_placeholders;
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Source of the admin configuration snapshot read by each lookup.
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    async fn admin_config(&self) -> anyhow::Result<AdminConfig>;
}

/// Fixed in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticConfig(pub AdminConfig);

#[async_trait]
impl ConfigProvider for StaticConfig {
    async fn admin_config(&self) -> anyhow::Result<AdminConfig> {
        Ok(self.0.clone())
    }
}

/// When a [`ConfigManager`] goes back to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReloadPolicy {
    /// Re-read the file on every lookup, so admin edits apply immediately.
    #[default]
    EveryRequest,
    /// Serve the loaded snapshot until [`ConfigManager::reload`] is called.
    OnDemand,
}

/// File-backed admin configuration
pub struct ConfigManager {
    config_path: PathBuf,
    policy: ReloadPolicy,
    admin: Arc<RwLock<AdminConfig>>,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, policy: ReloadPolicy) -> anyhow::Result<Self> {
        let initial = Self::load_admin(&config_path)?;
        Ok(Self {
            config_path,
            policy,
            admin: Arc::new(RwLock::new(initial)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.config_path
    }

    fn load_admin(path: &Path) -> anyhow::Result<AdminConfig> {
        // A missing file is an empty configuration: every lookup will 404.
        if !path.exists() {
            tracing::warn!("Admin configuration not found at {:?}, starting empty", path);
            return Ok(AdminConfig::default());
        }

        let admin = AdminConfig::load_from_file(path)
            .map_err(|e| anyhow::anyhow!("load admin config {:?}: {e}", path))?;
        warn_unusable_entries(&admin);
        tracing::debug!(
            categories = admin.custom_categories.len(),
            sources = admin.source_config.len(),
            "Admin configuration loaded"
        );
        Ok(admin)
    }

    /// Re-read the file and replace the cached snapshot.
    pub async fn reload(&self) -> anyhow::Result<()> {
        let fresh = Self::load_admin(&self.config_path)?;
        *self.admin.write().await = fresh;
        Ok(())
    }

    pub async fn snapshot(&self) -> AdminConfig {
        self.admin.read().await.clone()
    }
}

#[async_trait]
impl ConfigProvider for ConfigManager {
    async fn admin_config(&self) -> anyhow::Result<AdminConfig> {
        if self.policy == ReloadPolicy::EveryRequest {
            self.reload().await?;
        }
        Ok(self.snapshot().await)
    }
}

/// Log entries no lookup can use. Nothing is rejected: a broken entry only
/// affects the lookups that resolve to it.
fn warn_unusable_entries(admin: &AdminConfig) {
    for category in &admin.custom_categories {
        if category.query.is_empty() {
            tracing::warn!(name = %category.name, "Custom category has an empty query");
        }
    }
    for source in &admin.source_config {
        if source.key.is_empty() {
            tracing::warn!(name = %source.name, "Source has an empty key");
        }
        if source.api.is_empty() {
            tracing::warn!(
                source = %source.key,
                disabled = source.disabled,
                "Source has an empty API template"
            );
            continue;
        }
        let missing = missing_placeholders(&source.api);
        if !missing.is_empty() {
            tracing::warn!(source = %source.key, ?missing, "API template lacks placeholders");
        }
    }
}

/// Admin file path: `SOURCE_PROBE_CONFIG`, else the user config directory.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = std::env::var("SOURCE_PROBE_CONFIG") {
        PathBuf::from(path)
    } else {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("source-probe")
            .join("admin.toml")
    }
}
