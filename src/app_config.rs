use std::fs;
use std::io;
use std::path::Path;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::llm_handler::LLMProvider;

pub const APP_CONFIG_FILE: &str = "gtm_config.json";
pub const DEFAULT_STATIC_DIR: &str = "./frontend/dist";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;

/// Service settings persisted next to the binary. API keys stay in the
/// environment and never land in this file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub llm_provider: Option<LLMProvider>,
    pub anthropic_model: Option<String>,
    pub openrouter_model: Option<String>,
    pub gemini_model: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub static_dir: Option<String>,
}

impl AppConfig {
    pub fn provider(&self) -> LLMProvider {
        self.llm_provider.clone().unwrap_or_default()
    }

    pub fn request_timeout_secs(&self) -> u64 {
        self.request_timeout_secs.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    pub fn static_dir(&self) -> &str {
        self.static_dir.as_deref().unwrap_or(DEFAULT_STATIC_DIR)
    }
}

pub struct AppConfigManager {
    config_file: String,
    config: RwLock<AppConfig>,
}

impl AppConfigManager {
    pub fn new(config_file: &str) -> Self {
        Self {
            config_file: config_file.to_string(),
            config: RwLock::new(AppConfig::default()),
        }
    }

    pub fn config_file(&self) -> &str {
        &self.config_file
    }

    pub fn load_config(&self) -> io::Result<AppConfig> {
        let config_path = Path::new(&self.config_file);

        // A missing file means defaults
        if !config_path.exists() {
            return Ok(AppConfig::default());
        }

        let config_str = fs::read_to_string(config_path)?;
        let config: AppConfig = serde_json::from_str(&config_str)?;

        *self.config.write() = config.clone();

        Ok(config)
    }

    pub fn save_config(&self, config: &AppConfig) -> io::Result<()> {
        let config_str = serde_json::to_string_pretty(config)?;

        if let Some(parent) = Path::new(&self.config_file).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.config_file, config_str)?;

        *self.config.write() = config.clone();

        Ok(())
    }

    pub fn get_config(&self) -> AppConfig {
        self.config.read().clone()
    }
}
