/// Default lattice step in source units (metres)
pub const DEFAULT_GRID_SPACING: f64 = 50.0;

/// Default ingestion subsampling factor (keep every 10th record)
pub const DEFAULT_STRIDE: usize = 10;

/// Upper limit on lattice nodes for a single generation call
pub const MAX_GRID_NODES: usize = 25_000_000;

/// Default inclusive elevation band for the coordinate scan workflow
pub const DEFAULT_ELEVATION_MIN: f64 = 5.0;
pub const DEFAULT_ELEVATION_MAX: f64 = 100.0;

/// Coordinate labels are placed every N lattice nodes, N in this range
pub const LABEL_INTERVAL_MIN: usize = 1;
pub const LABEL_INTERVAL_MAX: usize = 5;

/// Lattice columns per label step before clamping
pub const LABEL_INTERVAL_DIVISOR: usize = 10;

/// First survey station number and increment between stations
pub const STATION_START: u64 = 1000;
pub const STATION_STEP: u64 = 10;

/// Lines between ingestion progress updates
pub const INGEST_PROGRESS_INTERVAL: usize = 10_000;

/// Points per chunk for parallel bounds reduction
pub const BOUNDS_CHUNK_SIZE: usize = 25_000;
