//! Pipeline orchestration from an XYZ file to grid, mesh, scene and exports.
use crate::bounds::{Bounds, filter_by_elevation};
use crate::config::GridConfig;
use crate::error::{Result, TerrainError};
use crate::export::{CoordinateExporter, ExportContext, ExportFiles};
use crate::grid::{GridBuilder, GridResult};
use crate::interpolation::{Interpolator, NodeSource};
use crate::layout::SurveyGrid;
use crate::manifest::{GridManifest, LatticeInfo, ManifestGenerator, SourceInfo};
use crate::mesh::{Triangle, triangulate};
use crate::point::PointSet;
use crate::scene::{SceneEmitter, SceneSink, SceneSummary};
use crate::xyz::{Ingested, ingest_file};
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Everything one `generate` call produced.
#[derive(Debug)]
pub struct GenerationReport {
    pub ingested: Ingested,
    pub grid: GridResult,
    pub triangles: Vec<Triangle>,
    pub scene: SceneSummary,
    pub exports: Option<ExportFiles>,
    pub manifest_path: PathBuf,
}

/// Bounds before and after the elevation filter.
#[derive(Debug)]
pub struct ScanReport {
    pub point_count: usize,
    pub diagnostics: usize,
    pub original_bounds: Bounds,
    pub filtered_points: PointSet,
    /// `None` when no point lies inside the elevation band.
    pub filtered_bounds: Option<Bounds>,
}

/// Terrain grid generator bound to one input file and configuration.
pub struct TerrainGridGenerator {
    /// XYZ source file.
    input_path: PathBuf,
    /// Directory receiving exports and the manifest.
    output_dir: PathBuf,
    /// File stem shared by every output.
    output_name: String,
    config: GridConfig,
    show_progress: bool,
}

impl TerrainGridGenerator {
    /// Validates the configuration up front. Outputs default to the
    /// input file's directory.
    pub fn new(input_path: &Path, output_dir: Option<&Path>, config: GridConfig) -> Result<Self> {
        config.validate()?;

        let output_dir = match output_dir {
            Some(dir) => dir.to_path_buf(),
            None => input_path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."))
                .to_path_buf(),
        };
        let output_name = input_path
            .file_stem()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        Ok(Self {
            input_path: input_path.to_path_buf(),
            output_dir,
            output_name,
            config,
            show_progress: false,
        })
    }

    /// Draw terminal progress bars for long stages.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Full pipeline: ingest, grid, mesh, scene records, exports, manifest.
    pub fn generate(&self, sink: &mut dyn SceneSink) -> Result<GenerationReport> {
        info!("Generating terrain grid from {}", self.input_path.display());
        info!(
            "Settings: spacing={} stride={} search_radius={}",
            self.config.spacing, self.config.stride, self.config.search_radius
        );

        let ingested = self.ingest(self.config.stride)?;

        let grid = GridBuilder::new(self.config.spacing)
            .with_params(self.config.idw_params())
            .with_progress(self.progress_bar(
                "[{bar:40.green/blue}] {pos}/{len} columns ({percent}%) {msg}",
                "Interpolating grid",
            ))
            .build(&ingested.points)?;

        let triangles = if self.config.create_faces {
            triangulate(&grid.lattice)
        } else {
            Vec::new()
        };
        info!("Triangulated {} terrain faces", triangles.len());

        let scene = self.emit_scene(sink, &ingested.points, &grid, &triangles)?;

        let exports = if self.config.export_coordinates {
            fs::create_dir_all(&self.output_dir)
                .map_err(|e| TerrainError::io(&self.output_dir, e))?;
            let exporter = CoordinateExporter::new(ExportContext::new(self.source_name()));
            Some(exporter.export_to_dir(
                &self.output_dir,
                &self.output_name,
                &ingested.points,
                Some(&grid.lattice),
            )?)
        } else {
            None
        };

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| TerrainError::io(&self.output_dir, e))?;
        let manifest = self.build_manifest(&ingested, &grid, &triangles, scene, exports.clone());
        let manifest_path =
            ManifestGenerator::new(&self.output_dir, &self.output_name).write(&manifest)?;

        info!("Terrain grid generation complete!");
        Ok(GenerationReport {
            ingested,
            grid,
            triangles,
            scene,
            exports,
            manifest_path,
        })
    }

    /// Coordinate scan: bounds of every record, then of the configured
    /// elevation band.
    pub fn scan(&self) -> Result<ScanReport> {
        let ingested = self.ingest(1)?;
        let original_bounds = Bounds::from_points(&ingested.points)?;
        self.log_bounds("Initial", &original_bounds);

        let (min_z, max_z) = (self.config.elevation_min, self.config.elevation_max);
        info!("Filtering coordinates with Z between {} and {}", min_z, max_z);
        let filtered_points = filter_by_elevation(&ingested.points, min_z, max_z);
        info!(
            "Total original points: {}, filtered points: {}",
            ingested.points.len(),
            filtered_points.len()
        );

        let filtered_bounds = if filtered_points.is_empty() {
            warn!("No points remain after filtering");
            None
        } else {
            let bounds = Bounds::from_points(&filtered_points)?;
            self.log_bounds("Filtered", &bounds);
            Some(bounds)
        };

        Ok(ScanReport {
            point_count: ingested.points.len(),
            diagnostics: ingested.diagnostics.len(),
            original_bounds,
            filtered_points,
            filtered_bounds,
        })
    }

    /// Survey station markers over the unsampled point set.
    pub fn stations(
        &self,
        interval: usize,
        prefix: &str,
        sink: &mut dyn SceneSink,
    ) -> Result<usize> {
        let ingested = self.ingest(1)?;
        if ingested.points.is_empty() {
            return Err(TerrainError::EmptySet { stage: "survey stations" });
        }
        let mut emitter = SceneEmitter::new(sink, self.config.display_scale);
        let count = emitter.stations(&ingested.points, interval, prefix)?;
        info!("XYZ survey grid created with {} stations", count);
        Ok(count)
    }

    /// Survey station lattice anchored at the footprint's minimum corner,
    /// station elevations sampled from the input surface.
    pub fn survey(&self, grid: &SurveyGrid, sink: &mut dyn SceneSink) -> Result<usize> {
        grid.validate()?;
        let ingested = self.ingest(1)?;
        let bounds = Bounds::from_points(&ingested.points)?;
        let surface = Interpolator::new(&ingested.points, self.config.idw_params())?;
        let anchored = SurveyGrid {
            origin: (bounds.min_x, bounds.min_y),
            ..grid.clone()
        };

        let mut emitter = SceneEmitter::new(sink, self.config.display_scale);
        let count = emitter.survey_grid(&anchored, Some(&surface))?;
        info!(
            "Survey grid created: {}x{} = {} stations at {} intervals",
            anchored.stations_x,
            anchored.stations_y,
            count,
            anchored.station_interval()
        );
        Ok(count)
    }

    fn ingest(&self, stride: usize) -> Result<Ingested> {
        let pb = self.progress_bar(
            "[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({percent}%) {msg}",
            "Reading records",
        );
        let ingested = ingest_file(&self.input_path, stride, &pb)?;
        if !ingested.diagnostics.is_empty() {
            warn!(
                "{} invalid lines skipped in {}",
                ingested.diagnostics.len(),
                self.input_path.display()
            );
        }
        Ok(ingested)
    }

    fn emit_scene(
        &self,
        sink: &mut dyn SceneSink,
        points: &PointSet,
        grid: &GridResult,
        triangles: &[Triangle],
    ) -> Result<SceneSummary> {
        let mut emitter = SceneEmitter::new(sink, self.config.display_scale);

        let markers = emitter.source_points(points)?;
        info!("Created {} coordinate reference points", markers);

        let lines = emitter.grid_lines(grid, self.config.line_style)?;
        info!("Created {} terrain-following grid lines", lines);

        if self.config.create_faces {
            let faces = emitter.faces(&grid.lattice, triangles)?;
            info!("Created {} terrain faces", faces);
        }
        if self.config.show_labels {
            let labels = emitter.labels(&grid.lattice)?;
            info!("Created {} coordinate labels", labels);
        }

        Ok(emitter.summary())
    }

    fn build_manifest(
        &self,
        ingested: &Ingested,
        grid: &GridResult,
        triangles: &[Triangle],
        scene: SceneSummary,
        exports: Option<ExportFiles>,
    ) -> GridManifest {
        GridManifest {
            source: SourceInfo {
                file: self.source_name(),
                lines_read: ingested.lines_read,
                records_sampled: ingested.records_sampled,
                point_count: ingested.points.len(),
                diagnostics: ingested.diagnostics.len(),
                bounds: grid.bounds,
            },
            lattice: LatticeInfo {
                x_count: grid.x_count(),
                y_count: grid.y_count(),
                spacing: grid.spacing,
                exact_nodes: grid.lattice.count_by_source(NodeSource::Exact),
                interpolated_nodes: grid.lattice.count_by_source(NodeSource::Interpolated),
                triangles: triangles.len(),
            },
            config: self.config.clone(),
            scene,
            exports,
            generated: chrono::Local::now(),
        }
    }

    fn source_name(&self) -> String {
        self.input_path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    fn progress_bar(&self, template: &str, message: &'static str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let style = ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("▉▊▋▌▍▎▏ ");
        let pb = ProgressBar::new(0).with_style(style);
        pb.set_message(message);
        pb
    }

    fn log_bounds(&self, label: &str, bounds: &Bounds) {
        info!("{} Min/Max Coordinates:", label);
        info!("  X: {} - {}", bounds.min_x, bounds.max_x);
        info!("  Y: {} - {}", bounds.min_y, bounds.max_y);
        info!("  Z: {} - {}", bounds.min_z, bounds.max_z);
    }
}
