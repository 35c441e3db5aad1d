/// Search radius for inverse distance weighting, in source units (metres)
pub const DEFAULT_SEARCH_RADIUS: f64 = 500.0;

/// Maximum neighbours contributing to one weighted estimate
pub const DEFAULT_MAX_NEIGHBOURS: usize = 6;

/// Planar distance below which a source point is treated as coincident
pub const DEFAULT_COINCIDENT_DISTANCE: f64 = 0.01;
