pub mod http;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::backend::{ BackendReply, ChatRequest, SystemStats, UserHistory };
use self::http::HttpBackendClient;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Backend returned status {0}")]
    Status(u16),
    #[error("Could not decode backend response: {0}")]
    Decode(String),
    #[error("Backend rejected the request: {0}")]
    Rejected(String),
    #[error("Backend returned no text")]
    EmptyReply,
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),
}

#[derive(Debug, Clone)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Injected as `user_id` into every JSON body when set.
    pub user_id: Option<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_id: None,
        }
    }
}

/// The external language backend. Only `health` and `send_message` feed the chat view;
/// the rest are operator calls.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn health(&self) -> Result<JsonValue, BackendError>;

    async fn send_message(&self, request: ChatRequest) -> Result<BackendReply, BackendError>;

    async fn user_history(&self, user_id: &str, limit: usize) -> Result<UserHistory, BackendError>;

    async fn system_stats(&self) -> Result<SystemStats, BackendError>;

    async fn train_models(&self) -> Result<JsonValue, BackendError>;

    async fn export_dataset(&self) -> Result<JsonValue, BackendError>;

    async fn create_backup(&self) -> Result<JsonValue, BackendError>;

    fn base_url(&self) -> &str;
}

pub fn new_client(config: &BackendConfig) -> Result<Arc<dyn BackendClient>, BackendError> {
    let client = HttpBackendClient::from_config(config)?;
    Ok(Arc::new(client))
}
