//! Run configuration.
//!
//! Precedence, lowest first: built-in defaults, an optional TOML file,
//! command-line overrides. Validation runs once before any work starts.
use crate::error::{Result, TerrainError};
use crate::interpolation::IdwParams;
use crate::scene::{DisplayScale, LineStyle};
use constants::grid::{
    DEFAULT_ELEVATION_MAX, DEFAULT_ELEVATION_MIN, DEFAULT_GRID_SPACING, DEFAULT_STRIDE,
};
use constants::interpolation::{
    DEFAULT_COINCIDENT_DISTANCE, DEFAULT_MAX_NEIGHBOURS, DEFAULT_SEARCH_RADIUS,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Lattice step in source units
    pub spacing: f64,
    /// Keep every n-th non-blank input line
    pub stride: usize,
    pub search_radius: f64,
    pub max_neighbours: usize,
    pub coincident_distance: f64,
    /// Inclusive elevation band for the scan workflow
    pub elevation_min: f64,
    pub elevation_max: f64,
    pub create_faces: bool,
    pub show_labels: bool,
    pub export_coordinates: bool,
    pub line_style: LineStyle,
    pub display_scale: DisplayScale,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing: DEFAULT_GRID_SPACING,
            stride: DEFAULT_STRIDE,
            search_radius: DEFAULT_SEARCH_RADIUS,
            max_neighbours: DEFAULT_MAX_NEIGHBOURS,
            coincident_distance: DEFAULT_COINCIDENT_DISTANCE,
            elevation_min: DEFAULT_ELEVATION_MIN,
            elevation_max: DEFAULT_ELEVATION_MAX,
            create_faces: true,
            show_labels: true,
            export_coordinates: true,
            line_style: LineStyle::default(),
            display_scale: DisplayScale::default(),
        }
    }
}

impl GridConfig {
    /// Load a TOML file; missing keys fall back to defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| TerrainError::io(path, e))?;
        let config = Self::from_toml(&text).map_err(|source| TerrainError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Loaded configuration from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub fn from_toml(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Defaults, or the file's values when a path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn idw_params(&self) -> IdwParams {
        IdwParams {
            search_radius: self.search_radius,
            max_neighbours: self.max_neighbours,
            coincident_distance: self.coincident_distance,
        }
    }

    /// Check every numeric constraint; spacing is reported on its own.
    pub fn validate(&self) -> Result<()> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(TerrainError::InvalidSpacing(self.spacing));
        }
        if self.stride == 0 {
            return Err(TerrainError::InvalidConfiguration(
                "stride must be at least 1".to_string(),
            ));
        }
        self.idw_params().validate()?;
        if self.elevation_min.is_nan()
            || self.elevation_max.is_nan()
            || self.elevation_min > self.elevation_max
        {
            return Err(TerrainError::InvalidConfiguration(format!(
                "elevation range [{}, {}] is empty",
                self.elevation_min, self.elevation_max
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = GridConfig::default();
        config.validate().unwrap();
        assert_eq!(config.idw_params(), IdwParams::default());
        assert_eq!(config.stride, 10);
        assert_eq!(config.spacing, 50.0);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GridConfig::from_toml(
            r#"
spacing = 25.0
line_style = "thick"
display_scale = "legacy"
"#,
        )
        .unwrap();
        assert_eq!(config.spacing, 25.0);
        assert_eq!(config.line_style, LineStyle::Thick);
        assert_eq!(config.display_scale, DisplayScale::Legacy);
        assert_eq!(config.search_radius, 500.0);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(GridConfig::from_toml("spaceing = 3.0").is_err());
    }

    #[test]
    fn invalid_values_fail_fast() {
        let bad_spacing = GridConfig {
            spacing: 0.0,
            ..GridConfig::default()
        };
        assert!(matches!(
            bad_spacing.validate(),
            Err(TerrainError::InvalidSpacing(_))
        ));

        for config in [
            GridConfig {
                stride: 0,
                ..GridConfig::default()
            },
            GridConfig {
                search_radius: -5.0,
                ..GridConfig::default()
            },
            GridConfig {
                max_neighbours: 0,
                ..GridConfig::default()
            },
            GridConfig {
                elevation_min: 10.0,
                elevation_max: 1.0,
                ..GridConfig::default()
            },
        ] {
            assert!(matches!(
                config.validate(),
                Err(TerrainError::InvalidConfiguration(_))
            ));
        }
    }

    #[test]
    fn file_errors_name_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("grid.toml");
        fs::write(&path, "spacing = \"wide\"").unwrap();
        let err = GridConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, TerrainError::ConfigParse { .. }));

        let missing = GridConfig::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
        assert!(matches!(missing, TerrainError::Io { .. }));
    }
}
