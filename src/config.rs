//! Run configuration loaded from TOML
//!
//! Every section and key is optional. Unknown keys are rejected so typos
//! do not silently fall back to defaults.

use log::{debug, info};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{ClipError, ClipResult};

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "rasterclip.toml";

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub engine: EngineConfig,
    pub selection: SelectionConfig,
    pub workspace: WorkspaceConfig,
    pub log: LogConfig,
}

/// External programs and their tuning
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    pub gdal_rasterize: String,
    pub gdalwarp: String,
    pub multithread: bool,
    pub ignore_bad_cutline: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            gdal_rasterize: "gdal_rasterize".to_string(),
            gdalwarp: "gdalwarp".to_string(),
            multithread: true,
            ignore_bad_cutline: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SelectionConfig {
    /// Write selected features to a scoped dataset instead of letting the engine filter
    pub materialize: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        SelectionConfig { materialize: true }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Parent of temporary datasets, system temp dir when unset
    pub temp_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
    /// Run journal file, none when unset
    pub journal: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        LogConfig {
            level: "info".to_string(),
            journal: Some(PathBuf::from("rasterclip.log")),
        }
    }
}

impl Config {
    /// Parse configuration text
    pub fn from_toml(text: &str) -> ClipResult<Self> {
        toml::from_str(text).map_err(|e| ClipError::Config(e.to_string()))
    }

    /// Load configuration
    ///
    /// An explicit path must exist. Without one, `rasterclip.toml` in the
    /// working directory is used when present, defaults otherwise.
    pub fn load(path: Option<&Path>) -> ClipResult<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    debug!("No {} found, using default configuration", DEFAULT_CONFIG_FILE);
                    return Ok(Config::default());
                }
                fallback
            },
        };

        let text = fs::read_to_string(&path)
            .map_err(|e| ClipError::Config(format!("Cannot read {}: {}", path.display(), e)))?;
        let config = Config::from_toml(&text)?;
        info!("Loaded configuration from {}", path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        assert_eq!(Config::from_toml("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = Config::from_toml(
            r#"
            [engine]
            gdalwarp = "/opt/gdal/bin/gdalwarp"
            multithread = false

            [workspace]
            temp_dir = "/scratch"
            "#,
        )
        .unwrap();

        assert_eq!(config.engine.gdalwarp, "/opt/gdal/bin/gdalwarp");
        assert_eq!(config.engine.gdal_rasterize, "gdal_rasterize");
        assert!(!config.engine.multithread);
        assert!(config.engine.ignore_bad_cutline);
        assert!(config.selection.materialize);
        assert_eq!(config.workspace.temp_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_unknown_keys_rejected() {
        assert!(matches!(Config::from_toml("[engine]\ngdal_warp = \"x\"\n"), Err(ClipError::Config(_))));
        assert!(matches!(Config::from_toml("[output]\nformat = \"GTiff\"\n"), Err(ClipError::Config(_))));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.toml");
        fs::write(&path, "[selection]\nmaterialize = false\n[log]\nlevel = \"debug\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert!(!config.selection.materialize);
        assert_eq!(config.log.level, "debug");
    }

    #[test]
    fn test_load_missing_explicit_file() {
        let result = Config::load(Some(Path::new("/nonexistent/rasterclip.toml")));
        assert!(matches!(result, Err(ClipError::Config(_))));
    }
}
