use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::currency::{default_rates, RateTable, BASE_CURRENCY};
use crate::error::{Result, SoukError};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_company_id")]
    pub company_id: i64,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    /// Files above this size are rejected before being read.
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    #[serde(default = "default_rates")]
    pub rates: HashMap<String, f64>,
    /// Where staged batches land; empty means ~/Documents/souk/outbox.
    #[serde(default)]
    pub outbox_dir: String,
}

fn default_company_id() -> i64 {
    1
}

fn default_base_currency() -> String {
    BASE_CURRENCY.to_string()
}

fn default_max_file_size_mb() -> u64 {
    10
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            company_id: default_company_id(),
            base_currency: default_base_currency(),
            max_file_size_mb: default_max_file_size_mb(),
            rates: default_rates(),
            outbox_dir: String::new(),
        }
    }
}

impl Settings {
    pub fn rate_table(&self) -> RateTable {
        RateTable::new(&self.base_currency, self.rates.clone())
    }

    pub fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb * 1024 * 1024
    }

    pub fn outbox_dir(&self) -> PathBuf {
        if self.outbox_dir.is_empty() {
            default_outbox_dir()
        } else {
            PathBuf::from(&self.outbox_dir)
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("souk")
}

fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

fn default_outbox_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Documents")
        .join("souk")
        .join("outbox")
}

pub fn load_settings() -> Settings {
    let path = settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    let dir = config_dir();
    std::fs::create_dir_all(&dir)?;
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| SoukError::Settings(e.to_string()))?;
    std::fs::write(settings_path(), format!("{json}\n"))?;
    Ok(())
}
