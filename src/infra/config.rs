// src/infra/config.rs — Configuration loading (TOML)

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::core::types::Provider;
use crate::infra::paths;

/// Environment variable that overrides `backend.base_url`.
pub const API_URL_ENV: &str = "DOCQUERY_API_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: BackendConfig,

    /// Per-provider base URLs. Unset providers are not wired to a backend,
    /// except the test case generator which falls back to `backend.base_url`.
    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_upload_field")]
    pub upload_field: String,
    /// Transport timeout. None leaves requests unbounded.
    #[serde(default)]
    pub timeout_seconds: Option<u64>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            upload_field: default_upload_field(),
            timeout_seconds: None,
        }
    }
}

fn default_base_url() -> String {
    "http://127.0.0.1:5000".into()
}

fn default_upload_field() -> String {
    "file".into()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub test_case_generator: Option<String>,
    pub abap_code_generator: Option<String>,
    pub smart_connector: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial dark-mode preference for new sessions.
    pub dark_mode: bool,
    /// ANSI styling when stdout is a terminal.
    pub color: bool,
    pub render_markdown: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            dark_mode: false,
            color: true,
            render_markdown: true,
        }
    }
}

impl Config {
    /// Load config from file, falling back to defaults, then apply env overrides.
    pub fn load() -> anyhow::Result<Self> {
        let path = paths::config_file_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            Self::default()
        };
        config.apply_api_url(std::env::var(API_URL_ENV).ok());
        Ok(config)
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        tracing::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Override the default backend URL (blank values are ignored).
    pub fn apply_api_url(&mut self, url: Option<String>) {
        if let Some(url) = url.map(|u| u.trim().to_string()).filter(|u| !u.is_empty()) {
            tracing::debug!("Backend URL overridden to {}", url);
            self.backend.base_url = url;
        }
    }

    /// Base URL serving `provider`, without a trailing slash.
    pub fn route(&self, provider: Provider) -> Option<String> {
        let configured = match provider {
            Provider::TestCaseGenerator => self
                .providers
                .test_case_generator
                .clone()
                .or_else(|| Some(self.backend.base_url.clone())),
            Provider::AbapCodeGenerator => self.providers.abap_code_generator.clone(),
            Provider::SmartConnector => self.providers.smart_connector.clone(),
        };
        configured
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults_reasonable() {
        let c = Config::default();
        assert_eq!(c.backend.base_url, "http://127.0.0.1:5000");
        assert_eq!(c.backend.upload_field, "file");
        assert!(c.backend.timeout_seconds.is_none());
        assert!(!c.display.dark_mode);
        assert!(c.display.color);
        assert!(c.display.render_markdown);
    }

    #[test]
    fn test_parse_minimal_toml() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.backend.upload_field, "file");
    }

    #[test]
    fn test_parse_full_toml() {
        let toml_str = r#"
[backend]
base_url = "https://qa.example.com/"
upload_field = "document"
timeout_seconds = 120

[providers]
abap_code_generator = "https://abap.example.com"

[display]
dark_mode = true
color = false
render_markdown = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.backend.upload_field, "document");
        assert_eq!(config.backend.timeout_seconds, Some(120));
        assert!(config.display.dark_mode);
        assert!(!config.display.color);
        assert_eq!(
            config.route(Provider::TestCaseGenerator).as_deref(),
            Some("https://qa.example.com")
        );
        assert_eq!(
            config.route(Provider::AbapCodeGenerator).as_deref(),
            Some("https://abap.example.com")
        );
        assert_eq!(config.route(Provider::SmartConnector), None);
    }

    #[test]
    fn test_provider_override_beats_base_url() {
        let mut config = Config::default();
        config.providers.test_case_generator = Some("http://tests:9000".into());
        assert_eq!(
            config.route(Provider::TestCaseGenerator).as_deref(),
            Some("http://tests:9000")
        );
    }

    #[test]
    fn test_api_url_override() {
        let mut config = Config::default();
        config.apply_api_url(Some("http://backend:8080".into()));
        assert_eq!(config.backend.base_url, "http://backend:8080");
        config.apply_api_url(Some("   ".into()));
        assert_eq!(config.backend.base_url, "http://backend:8080");
        config.apply_api_url(None);
        assert_eq!(config.backend.base_url, "http://backend:8080");
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[display]\ndark_mode = true\ncolor = true\nrender_markdown = true\n")
            .unwrap();
        let config = Config::load_from(&path).unwrap();
        assert!(config.display.dark_mode);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load_from(Path::new("/nonexistent/config.toml"));
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(deserialized.backend.base_url, config.backend.base_url);
    }
}
