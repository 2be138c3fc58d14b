use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Result, SimplyError};
use crate::session::Target;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimplyConfig {
    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    #[serde(default)]
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Directory that receives per-session preview documents and transcripts.
    #[serde(default = "default_preview_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_target")]
    pub default_target: String,
}

fn default_endpoint() -> String {
    "https://n8n.uptodd.co.in/webhook/update-react".to_string()
}
fn default_timeout() -> u64 {
    300
}
fn default_preview_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("simply")
        .join("preview")
}
fn default_target() -> String {
    Target::default().label().to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            dir: default_preview_dir(),
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            default_target: default_target(),
        }
    }
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl SessionConfig {
    /// The configured default target, falling back to HTML/CSS for unknown labels.
    pub fn target(&self) -> Target {
        Target::from_label(&self.default_target).unwrap_or_default()
    }
}

impl SimplyConfig {
    /// Load config from ~/.config/simply/config.toml, creating defaults if missing.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from an explicit path, writing defaults there if it does not exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .map_err(|e| SimplyError::Config(format!("Failed to read config: {e}")))?;
            let config: SimplyConfig = toml::from_str(&contents)
                .map_err(|e| SimplyError::Config(format!("Failed to parse config: {e}")))?;
            Ok(config)
        } else {
            let config = SimplyConfig::default();
            config.save_to(config_path)?;
            Ok(config)
        }
    }

    /// Save config to disk.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| SimplyError::Config(format!("Failed to serialize config: {e}")))?;
        std::fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the config file path.
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| SimplyError::Config("Could not determine config directory".into()))?;
        Ok(config_dir.join("simply").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_webhook_contract() {
        let config = SimplyConfig::default();
        assert_eq!(
            config.api.endpoint,
            "https://n8n.uptodd.co.in/webhook/update-react"
        );
        assert_eq!(config.api.timeout(), Duration::from_secs(5 * 60));
        assert_eq!(config.session.target(), Target::HtmlCss);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let config: SimplyConfig = toml::from_str(
            r#"
            [api]
            endpoint = "http://127.0.0.1:5678/webhook"
            "#,
        )
        .unwrap();
        assert_eq!(config.api.endpoint, "http://127.0.0.1:5678/webhook");
        assert_eq!(config.api.timeout_seconds, 300);
        assert_eq!(config.session.default_target, "HTML/CSS");
    }

    #[test]
    fn unknown_target_label_falls_back() {
        let session = SessionConfig {
            default_target: "COBOL".to_string(),
        };
        assert_eq!(session.target(), Target::HtmlCss);
    }

    #[test]
    fn load_from_creates_then_rereads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let created = SimplyConfig::load_from(&path).unwrap();
        assert!(path.exists());

        let mut edited = created.clone();
        edited.api.timeout_seconds = 42;
        edited.save_to(&path).unwrap();

        let reloaded = SimplyConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.api.timeout_seconds, 42);
    }

    #[test]
    fn malformed_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[api\nendpoint = ").unwrap();
        let err = SimplyConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, SimplyError::Config(_)));
    }
}
