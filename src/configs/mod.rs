/*
This file is part of the shapefile_reader library.
Created: 16/10/2026
Last Modified: 16/10/2026
License: MIT
*/
use crate::error::{Result, ShapefileError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// The name of the settings file looked up by `get_configs`.
pub const SETTINGS_FILE: &str = "settings.json";

/// The largest record content, in bytes, that the reader buffers by default.
pub const MAXIMUM_RECORD_SIZE: usize = 16 * 1024 * 1024 - 100;

/// The default number of shapes to allocate for.
pub const SHAPES_RESERVE_SIZE: usize = 7500;

/// Where the y coordinate of a Point record sits relative to x.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum PointLayout {
    /// x at byte 0 and y at byte 8, as the ESRI format documents.
    Standard,
    /// x at byte 0 and y at byte 4, matching files produced for the older
    /// libShape reader.
    Legacy,
}

impl Default for PointLayout {
    fn default() -> PointLayout {
        PointLayout::Standard
    }
}

/// Reader settings. Backed by a settings.json file; missing keys take defaults.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ShapefileConfigs {
    pub max_record_size: usize,
    pub shapes_reserve: usize,
    pub point_layout: PointLayout,
    /// Reject headers whose file code is not 9994 or whose version is not 1000.
    pub strict: bool,
}

impl ShapefileConfigs {
    pub fn new() -> ShapefileConfigs {
        ShapefileConfigs {
            max_record_size: MAXIMUM_RECORD_SIZE,
            shapes_reserve: SHAPES_RESERVE_SIZE,
            point_layout: PointLayout::Standard,
            strict: false,
        }
    }
}

impl Default for ShapefileConfigs {
    fn default() -> ShapefileConfigs {
        ShapefileConfigs::new()
    }
}

/// Loads settings.json from `dir`, falling back to the defaults when the
/// file does not exist.
pub fn get_configs<P: AsRef<Path>>(dir: P) -> Result<ShapefileConfigs> {
    let config_file = dir.as_ref().join(SETTINGS_FILE);
    let contents = match fs::read_to_string(&config_file) {
        Ok(contents) => contents,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(ShapefileConfigs::new()),
        Err(e) => return Err(e.into()),
    };
    serde_json::from_str(&contents).map_err(|e| {
        ShapefileError::Config(format!("Failed to parse {}: {}", config_file.display(), e))
    })
}

pub fn save_configs<P: AsRef<Path>>(dir: P, configs: &ShapefileConfigs) -> Result<()> {
    let config_file = dir.as_ref().join(SETTINGS_FILE);
    let configs_json = serde_json::to_string_pretty(configs)
        .map_err(|e| ShapefileError::Config(format!("Error converting settings to JSON: {}", e)))?;
    fs::write(config_file, configs_json)?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::{get_configs, save_configs, PointLayout, ShapefileConfigs, MAXIMUM_RECORD_SIZE};
    use crate::error::ShapefileError;
    use std::fs;

    #[test]
    fn test_missing_settings_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let configs = get_configs(dir.path()).unwrap();
        assert_eq!(configs, ShapefileConfigs::new());
        assert_eq!(configs.max_record_size, MAXIMUM_RECORD_SIZE);
    }

    #[test]
    fn test_partial_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("settings.json"),
            r#"{ "point_layout": "legacy", "max_record_size": 1024 }"#,
        )
        .unwrap();
        let configs = get_configs(dir.path()).unwrap();
        assert_eq!(configs.point_layout, PointLayout::Legacy);
        assert_eq!(configs.max_record_size, 1024);
        assert!(!configs.strict);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let configs = ShapefileConfigs {
            strict: true,
            ..ShapefileConfigs::new()
        };
        save_configs(dir.path(), &configs).unwrap();
        assert_eq!(get_configs(dir.path()).unwrap(), configs);
    }

    #[test]
    fn test_malformed_settings_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("settings.json"), "{ not json").unwrap();
        match get_configs(dir.path()) {
            Err(ShapefileError::Config(_)) => {}
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }
}
