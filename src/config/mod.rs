#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::sheets::DEFAULT_PROXIES;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_nonzero_secs, validate_proxy_list, validate_sheet_reference, validate_state_dir,
    Validate,
};
use toml_config::TomlConfig;

pub const DEFAULT_STATE_DIR: &str = ".raffle";
pub const DEFAULT_CONFIG_FILE: &str = "raffle.toml";
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 15;
pub const DEFAULT_REFRESH_INTERVAL_SECS: u64 = 300;

/// Resolved settings: built-in defaults, then the TOML file, then command-line flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub state_dir: String,
    pub sheet_url: Option<String>,
    pub proxies: Vec<String>,
    pub timeout_seconds: u64,
    pub refresh_interval_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            state_dir: DEFAULT_STATE_DIR.to_string(),
            sheet_url: None,
            proxies: DEFAULT_PROXIES.iter().map(|p| p.to_string()).collect(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            refresh_interval_secs: DEFAULT_REFRESH_INTERVAL_SECS,
        }
    }
}

impl Settings {
    pub fn from_toml(config: &TomlConfig) -> Self {
        let mut settings = Self::default();
        if let Some(dir) = &config.store.state_dir {
            settings.state_dir = dir.clone();
        }
        if let Some(url) = &config.sheet.url {
            settings.sheet_url = Some(url.clone());
        }
        if let Some(proxies) = &config.sheet.proxies {
            settings.proxies = proxies.clone();
        }
        if let Some(timeout) = config.sheet.timeout_seconds {
            settings.timeout_seconds = timeout;
        }
        if let Some(interval) = config.sheet.refresh_interval_secs {
            settings.refresh_interval_secs = interval;
        }
        settings
    }
}

impl ConfigProvider for Settings {
    fn state_dir(&self) -> &str {
        &self.state_dir
    }

    fn sheet_url(&self) -> Option<&str> {
        self.sheet_url.as_deref()
    }

    fn proxies(&self) -> &[String] {
        &self.proxies
    }

    fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    fn refresh_interval_secs(&self) -> u64 {
        self.refresh_interval_secs
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_state_dir("store.state_dir", &self.state_dir)?;
        validate_nonzero_secs("sheet.timeout_seconds", self.timeout_seconds)?;
        validate_nonzero_secs("sheet.refresh_interval_secs", self.refresh_interval_secs)?;
        validate_proxy_list("sheet.proxies", &self.proxies)?;

        if let Some(url) = &self.sheet_url {
            validate_sheet_reference("sheet.url", url)?;
        }
        Ok(())
    }
}
