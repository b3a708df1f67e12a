//! Startup Configuration Module
//! Optional `salescope.json` in the working directory, for sessions that
//! always open the same sales export.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::analysis::Granularity;

pub const CONFIG_FILE: &str = "salescope.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Sales CSV to load on startup.
    pub data_path: Option<PathBuf>,
    /// Initial trend bucket resolution.
    pub granularity: Granularity,
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
    }

    /// A missing config is the normal case; a malformed one is logged and
    /// ignored rather than blocking startup.
    pub fn load_or_default() -> Self {
        let path = Path::new(CONFIG_FILE);
        if !path.exists() {
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("ignoring startup config: {err:#}");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_fields() {
        let path = std::env::temp_dir().join(format!(
            "salescope_config_{}.json",
            std::process::id()
        ));
        std::fs::write(
            &path,
            r#"{ "data_path": "cleandata.csv", "granularity": "Yearly" }"#,
        )
        .unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.data_path, Some(PathBuf::from("cleandata.csv")));
        assert_eq!(config.granularity, Granularity::Yearly);
    }

    #[test]
    fn test_config_defaults_missing_fields() {
        let path = std::env::temp_dir().join(format!(
            "salescope_config_empty_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{}").unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.data_path, None);
        assert_eq!(config.granularity, Granularity::Monthly);
    }

    #[test]
    fn test_config_rejects_garbage() {
        let path = std::env::temp_dir().join(format!(
            "salescope_config_bad_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "not json").unwrap();
        assert!(AppConfig::load(&path).is_err());
    }
}
