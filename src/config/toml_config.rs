use crate::utils::error::{RaffleError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid env var regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreConfig {
    pub state_dir: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetConfig {
    pub url: Option<String>,
    pub proxies: Option<Vec<String>>,
    pub timeout_seconds: Option<u64>,
    pub refresh_interval_secs: Option<u64>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(RaffleError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RaffleError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${SHEET_URL})，找不到就保留原字串
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[store]
state_dir = "./state"

[sheet]
url = "https://docs.google.com/spreadsheets/d/ABC/edit#gid=0"
proxies = ["direct", "https://corsproxy.io/?{url}"]
timeout_seconds = 10
refresh_interval_secs = 60
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.store.state_dir.as_deref(), Some("./state"));
        assert_eq!(config.sheet.proxies.as_ref().map(Vec::len), Some(2));
        assert_eq!(config.sheet.timeout_seconds, Some(10));
        assert_eq!(config.sheet.refresh_interval_secs, Some(60));
    }

    #[test]
    fn test_sections_are_optional() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.store.state_dir.is_none());
        assert!(config.sheet.url.is_none());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RAFFLE_TEST_SHEET_URL", "https://docs.google.com/spreadsheets/d/XYZ/edit");

        let config = TomlConfig::from_toml_str(
            r#"
[sheet]
url = "${RAFFLE_TEST_SHEET_URL}"
"#,
        )
        .unwrap();
        assert_eq!(
            config.sheet.url.as_deref(),
            Some("https://docs.google.com/spreadsheets/d/XYZ/edit")
        );

        std::env::remove_var("RAFFLE_TEST_SHEET_URL");
    }

    #[test]
    fn test_invalid_toml() {
        let err = TomlConfig::from_toml_str("[sheet\nurl = 1").unwrap_err();
        assert!(matches!(err, RaffleError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[store]\nstate_dir = \"/tmp/raffle\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.store.state_dir.as_deref(), Some("/tmp/raffle"));
    }
}
