//! Flat reference grids laid out from dimensions rather than point data.
use crate::error::{Result, TerrainError};
use crate::scene::LineStyle;
use constants::grid::STATION_START;
use constants::layout::{
    DEFAULT_PLAN_EXTENT, DEFAULT_PLAN_LABEL_EVERY, DEFAULT_PLAN_SPACING, DEFAULT_SURVEY_INTERVAL,
    DEFAULT_SURVEY_STATIONS, PLAN_LABEL_EVERY_MAX, SURVEY_STATIONS_MAX, SURVEY_STATIONS_MIN,
};
use serde::{Deserialize, Serialize};

/// Axis-aligned coordinate grid starting at `start`.
#[derive(Debug, Clone, PartialEq)]
pub struct CoordinateGrid {
    pub width: f64,
    pub height: f64,
    pub spacing: f64,
    pub start: (f64, f64),
    pub show_labels: bool,
    /// Axis labels on every n-th line.
    pub label_every: usize,
    pub style: LineStyle,
}

impl Default for CoordinateGrid {
    fn default() -> Self {
        Self {
            width: DEFAULT_PLAN_EXTENT,
            height: DEFAULT_PLAN_EXTENT,
            spacing: DEFAULT_PLAN_SPACING,
            start: (0.0, 0.0),
            show_labels: true,
            label_every: DEFAULT_PLAN_LABEL_EVERY,
            style: LineStyle::Thin,
        }
    }
}

impl CoordinateGrid {
    pub fn validate(&self) -> Result<()> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(TerrainError::InvalidSpacing(self.spacing));
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(TerrainError::InvalidConfiguration(format!(
                    "grid {} must be finite and greater than 0, got {}",
                    name, value
                )));
            }
        }
        if !(self.start.0.is_finite() && self.start.1.is_finite()) {
            return Err(TerrainError::InvalidConfiguration(
                "grid start must be finite".to_string(),
            ));
        }
        if !(1..=PLAN_LABEL_EVERY_MAX).contains(&self.label_every) {
            return Err(TerrainError::InvalidConfiguration(format!(
                "label interval must be between 1 and {}, got {}",
                PLAN_LABEL_EVERY_MAX, self.label_every
            )));
        }
        let (x_lines, y_lines) = self.line_counts();
        crate::grid::checked_node_count(x_lines, y_lines)?;
        Ok(())
    }

    /// Vertical and horizontal line counts.
    pub fn line_counts(&self) -> (usize, usize) {
        (
            ((self.width / self.spacing).floor() as usize).saturating_add(1),
            ((self.height / self.spacing).floor() as usize).saturating_add(1),
        )
    }
}

/// Station spacing preset applied on top of the base interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SurveyDensity {
    Fine,
    #[default]
    Standard,
    Coarse,
}

impl SurveyDensity {
    pub fn factor(self) -> f64 {
        match self {
            SurveyDensity::Fine => 0.5,
            SurveyDensity::Standard => 1.0,
            SurveyDensity::Coarse => 2.0,
        }
    }
}

/// Regular lattice of numbered survey stations.
#[derive(Debug, Clone, PartialEq)]
pub struct SurveyGrid {
    pub interval: f64,
    pub density: SurveyDensity,
    pub stations_x: usize,
    pub stations_y: usize,
    /// Number of the first station; the rest count up by one, X fastest.
    pub start_station: u64,
    pub origin: (f64, f64),
}

impl Default for SurveyGrid {
    fn default() -> Self {
        Self {
            interval: DEFAULT_SURVEY_INTERVAL,
            density: SurveyDensity::default(),
            stations_x: DEFAULT_SURVEY_STATIONS,
            stations_y: DEFAULT_SURVEY_STATIONS,
            start_station: STATION_START,
            origin: (0.0, 0.0),
        }
    }
}

impl SurveyGrid {
    pub fn validate(&self) -> Result<()> {
        if !(self.interval.is_finite() && self.interval > 0.0) {
            return Err(TerrainError::InvalidSpacing(self.interval));
        }
        let range = SURVEY_STATIONS_MIN..=SURVEY_STATIONS_MAX;
        if !range.contains(&self.stations_x) || !range.contains(&self.stations_y) {
            return Err(TerrainError::InvalidConfiguration(format!(
                "stations per axis must be between {} and {}, got {}x{}",
                SURVEY_STATIONS_MIN, SURVEY_STATIONS_MAX, self.stations_x, self.stations_y
            )));
        }
        if !(self.origin.0.is_finite() && self.origin.1.is_finite()) {
            return Err(TerrainError::InvalidConfiguration(
                "survey origin must be finite".to_string(),
            ));
        }
        Ok(())
    }

    /// Base interval scaled by the density preset.
    pub fn station_interval(&self) -> f64 {
        self.interval * self.density.factor()
    }

    /// Planar position of station `(i, j)`.
    pub fn position(&self, i: usize, j: usize) -> (f64, f64) {
        let step = self.station_interval();
        (
            self.origin.0 + i as f64 * step,
            self.origin.1 + j as f64 * step,
        )
    }
}
