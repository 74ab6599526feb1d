use crate::models::site::SiteContent;
use log::{ info, warn };
use std::fs;
use std::path::{ Path, PathBuf };
use std::sync::Arc;
use std::time::SystemTime;
use thiserror::Error;
use tokio::sync::RwLock as TokioRwLock;

/// Compiled-in copy of `json/site.json`, used when no content file is found on disk.
pub const EMBEDDED_SITE_CONTENT: &str = include_str!("../../json/site.json");

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Site content IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Site content JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid site content: {0}")]
    Invalid(String),
}

fn validate(content: &SiteContent) -> Result<(), ConfigError> {
    if content.data.header_data.is_empty() {
        return Err(ConfigError::Invalid("data.headerData must not be empty".to_string()));
    }
    if let Some(section) = content.data.footer_links_data.iter().find(|s| s.links.is_empty()) {
        return Err(
            ConfigError::Invalid(format!("footer section '{}' has no links", section.section))
        );
    }
    if content.home.faq.items.is_empty() {
        return Err(ConfigError::Invalid("home.faq.items must not be empty".to_string()));
    }
    Ok(())
}

pub fn load_site_content_from_str(json_str: &str) -> Result<SiteContent, ConfigError> {
    let content: SiteContent = serde_json::from_str(json_str)?;
    validate(&content)?;
    Ok(content)
}

pub fn load_site_content<P: AsRef<Path>>(path: P) -> Result<SiteContent, ConfigError> {
    let json_str = fs::read_to_string(path)?;
    load_site_content_from_str(&json_str)
}

pub fn embedded_site_content() -> Result<SiteContent, ConfigError> {
    load_site_content_from_str(EMBEDDED_SITE_CONTENT)
}

/// Live site content shared by the page handlers, reloadable from disk.
pub struct SiteContentStore {
    path: PathBuf,
    current: TokioRwLock<Arc<SiteContent>>,
    last_loaded: TokioRwLock<Option<SystemTime>>,
}

impl SiteContentStore {
    pub fn new(path: PathBuf, content: SiteContent, last_loaded: Option<SystemTime>) -> Self {
        Self {
            path,
            current: TokioRwLock::new(Arc::new(content)),
            last_loaded: TokioRwLock::new(last_loaded),
        }
    }

    /// Reads `path`, or falls back to the embedded copy when the file does not exist.
    pub fn initialize(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        if path.exists() {
            info!("Loading site content from: {}", path.display());
            let content = load_site_content(&path)?;
            Ok(Self::new(path, content, Some(SystemTime::now())))
        } else {
            warn!("Site content file '{}' not found, using embedded content", path.display());
            Ok(Self::new(path, embedded_site_content()?, None))
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn current(&self) -> Arc<SiteContent> {
        self.current.read().await.clone()
    }

    /// Returns `Ok(true)` when the file was re-read, `Ok(false)` when it was unchanged or absent.
    pub async fn reload_if_changed(&self) -> Result<bool, ConfigError> {
        let metadata = match fs::metadata(&self.path) {
            Ok(m) => m,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(false);
            }
            Err(e) => {
                return Err(e.into());
            }
        };

        let last_loaded = *self.last_loaded.read().await;
        let changed = match (metadata.modified().ok(), last_loaded) {
            (Some(modified), Some(last)) => modified > last,
            (_, None) => true,
            (None, Some(_)) => false,
        };
        if !changed {
            return Ok(false);
        }

        info!("Site content file changed, reloading...");
        let content = load_site_content(&self.path)?;
        *self.current.write().await = Arc::new(content);
        *self.last_loaded.write().await = Some(SystemTime::now());
        Ok(true)
    }
}
