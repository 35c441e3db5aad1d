//! Terrain grid generation from XYZ point clouds.
//!
//! Reads whitespace-separated `X Y Z` records, estimates elevations on a
//! regular lattice with inverse-distance weighting, splits each lattice
//! cell into two triangles and exports coordinates as text.
pub mod bounds;
pub mod config;
pub mod converter;
pub mod error;
pub mod export;
pub mod grid;
pub mod interpolation;
pub mod layout;
pub mod manifest;
pub mod mesh;
pub mod point;
pub mod scene;
pub mod xyz;

pub use bounds::{Bounds, bounds, filter_by_elevation};
pub use config::GridConfig;
pub use converter::{GenerationReport, ScanReport, TerrainGridGenerator};
pub use error::{Result, TerrainError};
pub use export::{CoordinateExporter, ExportContext, ExportFiles};
pub use grid::{GridBuilder, GridNode, GridResult, Lattice, build_grid};
pub use interpolation::{Estimate, IdwParams, Interpolator, NodeSource, interpolate};
pub use layout::{CoordinateGrid, SurveyDensity, SurveyGrid};
pub use mesh::{CellId, Half, Triangle, triangulate};
pub use point::{PointSet, SourcePoint};
pub use scene::{SceneEmitter, SceneRecord, SceneSink, record_scene};
pub use xyz::{Ingested, LineDiagnostic, ingest, ingest_file};
