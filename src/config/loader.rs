//! Configuration structure and loading logic.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Main configuration structure.
///
/// Keys match the upstream config file format (camelCase JSON). The
/// configuration is resolved once at startup (CLI overrides file overrides
/// defaults) and is immutable afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// FANBOXSESSID cookie value used to authenticate API calls.
    pub fanbox_session_id: String,

    /// Keep running as a daemon, polling for updated posts.
    #[serde(default = "default_true")]
    pub as_daemon: bool,

    /// Download everything the session can access before the daemon starts.
    #[serde(default = "default_true")]
    pub download_fanbox: bool,

    /// Seconds between two update polls in daemon mode.
    #[serde(default = "default_interval")]
    pub interval: u64,

    /// Base directory for downloaded content.
    #[serde(default = "default_download_dir")]
    pub download_dir: PathBuf,

    /// Optional proxy URL, `scheme://host:port` with scheme `http` or `socks5`.
    #[serde(default)]
    pub proxy: Option<String>,
}

fn default_true() -> bool {
    true
}

fn default_interval() -> u64 {
    180
}

fn default_download_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fanbox_session_id: String::new(),
            as_daemon: true,
            download_fanbox: true,
            interval: default_interval(),
            download_dir: default_download_dir(),
            proxy: None,
        }
    }
}

impl Config {
    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::Config(format!(
                    "Configuration file not found: {}. Create one from config.example.json",
                    path.display()
                ))
            } else {
                Error::Io(e)
            }
        })?;

        let config: Config = serde_json::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_applied() {
        let config: Config = serde_json::from_str(r#"{"fanboxSessionId": "abc"}"#).unwrap();
        assert_eq!(config.fanbox_session_id, "abc");
        assert!(config.as_daemon);
        assert!(config.download_fanbox);
        assert_eq!(config.interval, 180);
        assert_eq!(config.download_dir, PathBuf::from("."));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_camel_case_keys() {
        let config: Config = serde_json::from_str(
            r#"{
                "fanboxSessionId": "abc",
                "asDaemon": false,
                "downloadFanbox": false,
                "interval": 60,
                "downloadDir": "/data",
                "proxy": "http://127.0.0.1:8080"
            }"#,
        )
        .unwrap();
        assert!(!config.as_daemon);
        assert!(!config.download_fanbox);
        assert_eq!(config.interval, 60);
        assert_eq!(config.download_dir, PathBuf::from("/data"));
        assert_eq!(config.proxy.as_deref(), Some("http://127.0.0.1:8080"));
    }
}
