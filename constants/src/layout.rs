/// Coordinate grid defaults: extent and line spacing (metres)
pub const DEFAULT_PLAN_EXTENT: f64 = 1000.0;
pub const DEFAULT_PLAN_SPACING: f64 = 100.0;

/// Axis labels go on every N-th grid line, N in 1..=PLAN_LABEL_EVERY_MAX
pub const DEFAULT_PLAN_LABEL_EVERY: usize = 5;
pub const PLAN_LABEL_EVERY_MAX: usize = 50;

/// Survey grid station interval (metres) and stations per axis
pub const DEFAULT_SURVEY_INTERVAL: f64 = 100.0;
pub const DEFAULT_SURVEY_STATIONS: usize = 10;
pub const SURVEY_STATIONS_MIN: usize = 2;
pub const SURVEY_STATIONS_MAX: usize = 50;
