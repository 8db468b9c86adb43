//! Wall configuration documents.
//!
//! A configuration describes one wall: which variant to build, the layout
//! parameters and how the cutting plan is exported. Supports JSON and TOML
//! file formats, chosen by file extension.
//!
//! ```toml
//! [wall]
//! variant = "irregular"
//! guide = [[0.0, 0.0], [0.0, 400.0], [300.0, 400.0]]
//! simplify = true
//!
//! [parameters]
//! max_part_length = 250.0
//! thickness = 1.8
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use wallkit_core::{Point2, Point3};
use wallkit_layout::{BlueprintParameters, DxfLayers, GuideLine, WallInput};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Directory name under the platform config directory.
pub const CONFIG_DIR_NAME: &str = "wallkit";
/// File name of the default wall configuration.
pub const CONFIG_FILE_NAME: &str = "wall.toml";

/// The wall to build.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum WallSettings {
    /// A single straight run starting at the origin.
    Straight { length: f64 },
    /// A polyline guide; each point is `[x, y]` or `[x, y, z]`.
    Irregular {
        guide: Vec<Vec<f64>>,
        /// Merge collinear segments before laying out the wall
        #[serde(default)]
        simplify: bool,
    },
}

impl Default for WallSettings {
    fn default() -> Self {
        Self::Irregular {
            guide: vec![vec![0.0, 0.0], vec![0.0, 400.0], vec![300.0, 400.0]],
            simplify: false,
        }
    }
}

/// Export preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// DXF layer for outer contours
    pub outside_layer: String,
    /// DXF layer for through holes
    pub inside_layer: String,
    /// DXF layer for half-depth mill paths
    pub mill_layer: String,
    /// Indent JSON output
    pub pretty_json: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        let layers = DxfLayers::default();
        Self {
            outside_layer: layers.outside,
            inside_layer: layers.inside,
            mill_layer: layers.mill,
            pretty_json: true,
        }
    }
}

impl ExportSettings {
    pub fn layers(&self) -> DxfLayers {
        DxfLayers {
            outside: self.outside_layer.clone(),
            inside: self.inside_layer.clone(),
            mill: self.mill_layer.clone(),
        }
    }
}

/// Complete wall configuration
///
/// Aggregates all settings sections and provides file I/O operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct WallConfig {
    pub wall: WallSettings,
    #[serde(default)]
    pub parameters: BlueprintParameters,
    #[serde(default)]
    pub export: ExportSettings,
}

/// Serialization formats understood by [`WallConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Json,
    Toml,
}

impl Format {
    fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Format::Json),
            Some("toml") => Ok(Format::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl WallConfig {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// A default straight wall of `length`.
    pub fn straight(length: f64) -> Self {
        Self {
            wall: WallSettings::Straight { length },
            ..Self::default()
        }
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = Format::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| SettingsError::LoadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = match format {
            Format::Json => serde_json::from_str(&content)?,
            Format::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded wall configuration from {}", path.display());
        Ok(config)
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match Format::from_path(path)? {
            Format::Json => serde_json::to_string_pretty(self)?,
            Format::Toml => toml::to_string_pretty(self)?,
        };

        std::fs::write(path, content)
            .map_err(|e| SettingsError::SaveError(format!("{}: {}", path.display(), e)))?;

        info!("Saved wall configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> SettingsResult<()> {
        match &self.wall {
            WallSettings::Straight { length } => {
                if !length.is_finite() || *length <= 0.0 {
                    return Err(ConfigError::ValueOutOfRange {
                        key: "wall.length".to_string(),
                        value: length.to_string(),
                    }
                    .into());
                }
            }
            WallSettings::Irregular { guide, .. } => {
                if guide.is_empty() {
                    return Err(ConfigError::MissingKey("wall.guide".to_string()).into());
                }
                let dimension = guide[0].len();
                for (i, point) in guide.iter().enumerate() {
                    if point.len() != dimension || !(2..=3).contains(&point.len()) {
                        return Err(SettingsError::InvalidSetting {
                            key: format!("wall.guide[{}]", i),
                            reason: format!(
                                "expected {} coordinates, got {}",
                                dimension.clamp(2, 3),
                                point.len()
                            ),
                        });
                    }
                    if point.iter().any(|c| !c.is_finite()) {
                        return Err(SettingsError::InvalidSetting {
                            key: format!("wall.guide[{}]", i),
                            reason: "coordinates must be finite".to_string(),
                        });
                    }
                }
            }
        }

        let layers = [
            ("export.outside_layer", &self.export.outside_layer),
            ("export.inside_layer", &self.export.inside_layer),
            ("export.mill_layer", &self.export.mill_layer),
        ];
        for (key, name) in layers {
            if name.trim().is_empty() {
                return Err(SettingsError::InvalidSetting {
                    key: key.to_string(),
                    reason: "layer name must not be empty".to_string(),
                });
            }
        }

        Ok(())
    }

    /// Builds the layout engine input described by this configuration.
    pub fn to_wall_input(&self) -> SettingsResult<WallInput> {
        self.validate()?;
        match &self.wall {
            WallSettings::Straight { length } => Ok(WallInput::Straight { length: *length }),
            WallSettings::Irregular { guide, simplify } => {
                let line = if guide[0].len() == 3 {
                    let points: Vec<Point3<f64>> =
                        guide.iter().map(|p| Point3::new(p[0], p[1], p[2])).collect();
                    GuideLine::from_points_3d(&points)?
                } else {
                    let points: Vec<Point2<f64>> =
                        guide.iter().map(|p| Point2::new(p[0], p[1])).collect();
                    GuideLine::from_points(&points)?
                };
                let line = if *simplify {
                    let merged = line.simplified();
                    if merged.len() != line.len() {
                        debug!(from = line.len(), to = merged.len(), "simplified guide");
                    }
                    merged
                } else {
                    line
                };
                Ok(WallInput::Irregular { guide: line })
            }
        }
    }
}

/// Directory holding WallKit configuration files.
pub fn config_dir() -> SettingsResult<PathBuf> {
    dirs::config_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            SettingsError::ConfigDirectory("no config or home directory available".to_string())
        })
}

/// Location of the default wall configuration file.
pub fn default_config_path() -> SettingsResult<PathBuf> {
    Ok(config_dir()?.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = WallConfig::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.export.outside_layer, "OUTSIDE");
        assert!(matches!(
            config.to_wall_input().unwrap(),
            WallInput::Irregular { .. }
        ));
    }

    #[test]
    fn test_straight_length_must_be_positive() {
        let config = WallConfig::straight(-5.0);
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            SettingsError::Config(ConfigError::ValueOutOfRange { .. })
        ));
    }

    #[test]
    fn test_empty_guide_is_rejected() {
        let config = WallConfig {
            wall: WallSettings::Irregular {
                guide: Vec::new(),
                simplify: false,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SettingsError::Config(ConfigError::MissingKey(_)))
        ));
    }

    #[test]
    fn test_mixed_dimensions_are_rejected() {
        let config = WallConfig {
            wall: WallSettings::Irregular {
                guide: vec![vec![0.0, 0.0], vec![0.0, 100.0, 0.0]],
                simplify: false,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SettingsError::InvalidSetting { .. })
        ));
    }

    #[test]
    fn test_empty_layer_is_rejected() {
        let mut config = WallConfig::new();
        config.export.mill_layer = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_simplify_merges_collinear_points() {
        let config = WallConfig {
            wall: WallSettings::Irregular {
                guide: vec![vec![0.0, 0.0], vec![0.0, 100.0], vec![0.0, 250.0]],
                simplify: true,
            },
            ..Default::default()
        };
        let WallInput::Irregular { guide } = config.to_wall_input().unwrap() else {
            panic!("expected an irregular wall");
        };
        assert_eq!(guide.len(), 1);
    }

    #[test]
    fn test_non_planar_guide_is_rejected() {
        let config = WallConfig {
            wall: WallSettings::Irregular {
                guide: vec![vec![0.0, 0.0, 0.0], vec![0.0, 100.0, 5.0]],
                simplify: false,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.to_wall_input(),
            Err(SettingsError::Guide(_))
        ));
    }

    #[test]
    fn test_wall_variant_tag() {
        let json = serde_json::to_string(&WallConfig::straight(300.0)).unwrap();
        assert!(json.contains("\"variant\":\"straight\""));
        let back: WallConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, WallConfig::straight(300.0));
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config: WallConfig = toml::from_str(
            r#"
            [wall]
            variant = "straight"
            length = 500.0
            "#,
        )
        .unwrap();
        assert_eq!(config.parameters, BlueprintParameters::default());
        assert_eq!(config.export, ExportSettings::default());
    }

    #[test]
    fn test_unknown_extension() {
        let err = Format::from_path(Path::new("wall.yaml")).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(ref ext) if ext == "yaml"));
        assert!(matches!(
            Format::from_path(Path::new("wall")),
            Err(ConfigError::UnsupportedFormat(ref ext)) if ext == "<none>"
        ));
        assert_eq!(Format::from_path(Path::new("a/wall.json")).unwrap(), Format::Json);
    }

    #[test]
    fn test_default_config_path_file_name() {
        if let Ok(path) = default_config_path() {
            assert!(path.ends_with(Path::new(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)));
        }
    }
}
