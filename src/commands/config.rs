use tauri::command;
use tokio::sync::RwLock;

use crate::config::PoseCamConfig;

lazy_static::lazy_static! {
    static ref CONFIG: RwLock<PoseCamConfig> = RwLock::new(PoseCamConfig::load_or_default());
}

pub(crate) async fn current_config() -> PoseCamConfig {
    CONFIG.read().await.clone()
}

/// Get the active configuration.
#[command]
pub async fn get_config() -> Result<PoseCamConfig, String> {
    Ok(CONFIG.read().await.clone())
}

/// Replace the active configuration and persist it.
#[command]
pub async fn update_config(config: PoseCamConfig) -> Result<String, String> {
    config
        .validate()
        .map_err(|e| format!("Invalid configuration: {}", e))?;

    {
        let mut current = CONFIG.write().await;
        *current = config.clone();
    }

    let path = PoseCamConfig::default_path();
    tokio::task::spawn_blocking(move || config.save_to_file(&path))
        .await
        .map_err(|e| format!("Task join error: {}", e))?
        .map_err(|e| format!("Failed to save configuration: {}", e))?;

    log::info!("Configuration updated");
    Ok("Configuration updated".to_string())
}

/// Reset the configuration to built-in defaults.
#[command]
pub async fn reset_config() -> Result<PoseCamConfig, String> {
    let defaults = PoseCamConfig::default();
    {
        let mut current = CONFIG.write().await;
        *current = defaults.clone();
    }
    log::info!("Configuration reset to defaults");
    Ok(defaults)
}
