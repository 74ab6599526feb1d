use log::info;
use serde_json::Value as JsonValue;

use super::AdminCommand;
use crate::backend::{ BackendClient, BackendError };

fn to_json<T: serde::Serialize>(value: &T) -> Result<JsonValue, BackendError> {
    serde_json::to_value(value).map_err(|e| BackendError::Decode(e.to_string()))
}

/// Runs one operator call and returns the backend's JSON answer.
pub async fn run_admin(
    client: &dyn BackendClient,
    action: &AdminCommand
) -> Result<JsonValue, BackendError> {
    info!("Admin call {:?} against {}", action, client.base_url());
    match action {
        AdminCommand::History { user_id, limit } => {
            let history = client.user_history(user_id, *limit).await?;
            to_json(&history)
        }
        AdminCommand::Stats => {
            let stats = client.system_stats().await?;
            to_json(&stats)
        }
        AdminCommand::Train => client.train_models().await,
        AdminCommand::Export => client.export_dataset().await,
        AdminCommand::Backup => client.create_backup().await,
    }
}
