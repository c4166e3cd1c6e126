use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "argo-explorer.json";

/// Dashboard settings; every key is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Dataset loaded at startup.
    pub data_path: PathBuf,
    pub csv_download_url: String,
    pub json_download_url: String,
    pub window_width: f32,
    pub window_height: f32,
    /// Initial map centre as `[lon, lat]`.
    pub map_center: [f64; 2],
    /// Half-width of the initial map view, in degrees of longitude.
    pub map_span: f64,
    pub marker_radius: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("ArgoFloats_east.csv"),
            csv_download_url: "https://www.dropbox.com/s/80kbuzytevva13g/ArgoFloats.csv?dl=1"
                .to_string(),
            json_download_url: "https://www.dropbox.com/s/80kbuzytevva13g/ArgoFloats.csv?dl=1"
                .to_string(),
            window_width: 1400.0,
            window_height: 900.0,
            map_center: [70.0, 70.0],
            map_span: 60.0,
            marker_radius: 2.5,
        }
    }
}

impl Config {
    /// Read settings from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists.
    ///
    /// An explicitly named file must exist; a missing default file yields
    /// the built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !default.exists() {
                    log::debug!("No {DEFAULT_CONFIG_FILE} found, using defaults");
                    return Ok(Self::default());
                }
                default
            }
        };

        let text = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config = Self::from_json(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let cfg = Config::from_json(r#"{ "data_path": "floats.parquet", "map_center": [10.0, -5.0] }"#)
            .unwrap();
        assert_eq!(cfg.data_path, PathBuf::from("floats.parquet"));
        assert_eq!(cfg.map_center, [10.0, -5.0]);
        assert_eq!(cfg.window_width, Config::default().window_width);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::from_json(r#"{ "debug": true }"#).is_err());
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let missing = std::env::temp_dir().join("argo-explorer-no-such-config.json");
        assert!(Config::load(Some(missing.as_path())).is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let path = std::env::temp_dir().join(format!("argo-explorer-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "marker_radius": 4.0 }"#).unwrap();
        let cfg = Config::load(Some(path.as_path())).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(cfg.marker_radius, 4.0);
    }
}
