use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the chat/triage service
    pub api_base_url: String,

    /// Triago home directory
    #[serde(skip)]
    pub triago_home: PathBuf,

    /// UI preferences
    pub ui: UiConfig,
}

/// UI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    pub theme: String,
    /// How long a notice stays in the status line, in seconds
    pub notice_seconds: u64,
}

impl Default for Config {
    fn default() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("~"));
        Config {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            triago_home: home.join(".triago"),
            ui: UiConfig {
                theme: "dark".to_string(),
                notice_seconds: 4,
            },
        }
    }
}

impl Config {
    /// Load configuration from ~/.triago/config.toml, falling back to
    /// defaults when the file is absent.
    pub fn load() -> Result<Self> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        let triago_home = home.join(".triago");
        let config_path = triago_home.join("config.toml");

        fs::create_dir_all(&triago_home)
            .context("Failed to create .triago directory")?;

        let mut config = if config_path.exists() {
            let content = fs::read_to_string(&config_path)
                .context("Failed to read config file")?;
            toml::from_str(&content)
                .context("Failed to parse config file")?
        } else {
            Config::default()
        };

        config.triago_home = triago_home;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = self.triago_home.join("config.toml");
        let content = toml::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&config_path, content)
            .context("Failed to write config file")?;
        Ok(())
    }
}
