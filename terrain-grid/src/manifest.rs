//! Run manifest recording what one grid generation produced.
use crate::bounds::Bounds;
use crate::config::GridConfig;
use crate::error::{Result, TerrainError};
use crate::export::ExportFiles;
use crate::scene::SceneSummary;
use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Ingestion statistics for the source file.
#[derive(Serialize, Debug, Clone)]
pub struct SourceInfo {
    pub file: String,
    pub lines_read: usize,
    pub records_sampled: usize,
    pub point_count: usize,
    pub diagnostics: usize,
    pub bounds: Bounds,
}

/// Lattice shape and node provenance.
#[derive(Serialize, Debug, Clone)]
pub struct LatticeInfo {
    pub x_count: usize,
    pub y_count: usize,
    pub spacing: f64,
    pub exact_nodes: usize,
    pub interpolated_nodes: usize,
    pub triangles: usize,
}

#[derive(Serialize, Debug, Clone)]
pub struct GridManifest {
    pub source: SourceInfo,
    pub lattice: LatticeInfo,
    /// Effective configuration after all overrides.
    pub config: GridConfig,
    pub scene: SceneSummary,
    pub exports: Option<ExportFiles>,
    pub generated: DateTime<Local>,
}

/// Writes `<name>_grid_manifest.json` into the output directory.
pub struct ManifestGenerator {
    output_dir: PathBuf,
    output_name: String,
}

impl ManifestGenerator {
    pub fn new(output_dir: &Path, output_name: &str) -> Self {
        Self {
            output_dir: output_dir.to_path_buf(),
            output_name: output_name.to_string(),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_grid_manifest.json", self.output_name))
    }

    pub fn write(&self, manifest: &GridManifest) -> Result<PathBuf> {
        let path = self.manifest_path();
        let json = serde_json::to_string_pretty(manifest)?;
        fs::write(&path, json).map_err(|e| TerrainError::io(&path, e))?;

        info!("Generated grid manifest: {}", path.display());
        self.log_summary(manifest);
        Ok(path)
    }

    fn log_summary(&self, manifest: &GridManifest) {
        info!("Manifest Summary:");
        info!(
            "  Source points: {} ({} diagnostics)",
            manifest.source.point_count, manifest.source.diagnostics
        );
        info!(
            "  Footprint: ({:.2}, {:.2}) to ({:.2}, {:.2})",
            manifest.source.bounds.min_x,
            manifest.source.bounds.min_y,
            manifest.source.bounds.max_x,
            manifest.source.bounds.max_y
        );
        info!(
            "  Lattice: {} x {} at {} ({} exact, {} interpolated)",
            manifest.lattice.x_count,
            manifest.lattice.y_count,
            manifest.lattice.spacing,
            manifest.lattice.exact_nodes,
            manifest.lattice.interpolated_nodes
        );
        info!(
            "  Scene: {} grid lines, {} faces, {} labels",
            manifest.scene.grid_lines, manifest.scene.faces, manifest.scene.labels
        );
    }
}
