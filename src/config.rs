use serde::Deserialize;
use std::fs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyConfig {
    pub name: String,
    /// Path to a `.csv` or `.json` export of the survey responses.
    pub source: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub chat_id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Display label only; never used in calculations.
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default)]
    pub report_dir: Option<String>,
    /// Re-import and re-analyze on this interval. Absent means run once.
    #[serde(default)]
    pub check_interval_seconds: Option<u64>,
    #[serde(default)]
    pub telegram: Option<TelegramConfig>,
    pub surveys: Vec<SurveyConfig>,
}

fn default_currency() -> String {
    "€".to_string()
}

fn default_database_path() -> String {
    "surveys.db".to_string()
}

pub fn load_config(path: &str) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
