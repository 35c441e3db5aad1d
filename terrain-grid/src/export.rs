//! Plain-text coordinate export in original source units.
//!
//! Values are written with Rust's shortest round-trip float formatting so
//! that re-ingesting an export reproduces the exact values.
use crate::error::{Result, TerrainError};
use crate::grid::Lattice;
use crate::point::PointSet;
use serde::Serialize;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Context written into export headers.
#[derive(Debug, Clone)]
pub struct ExportContext {
    /// File name of the XYZ source.
    pub source_name: String,
    /// Timestamp string for the `Generated` header line.
    pub generated: String,
}

impl ExportContext {
    pub fn new(source_name: impl Into<String>) -> Self {
        Self {
            source_name: source_name.into(),
            generated: chrono::Local::now().to_rfc3339(),
        }
    }
}

/// Records written per destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ExportCounts {
    pub original_points: usize,
    pub grid_nodes: Option<usize>,
}

/// Paths of files produced by [`CoordinateExporter::export_to_dir`].
#[derive(Debug, Clone, Serialize)]
pub struct ExportFiles {
    pub original: PathBuf,
    pub grid: Option<PathBuf>,
    pub counts: ExportCounts,
}

pub struct CoordinateExporter {
    context: ExportContext,
}

impl CoordinateExporter {
    pub fn new(context: ExportContext) -> Self {
        Self { context }
    }

    /// Write source points, one `x y z` line each, after a `#` header.
    pub fn write_points<W: Write>(&self, points: &PointSet, out: &mut W) -> Result<usize> {
        writeln!(out, "# Original XYZ coordinates")?;
        writeln!(out, "# Format: X Y Z (meters)")?;
        writeln!(out, "# Records: {}", points.len())?;
        writeln!(out, "# Source: {}", self.context.source_name)?;
        writeln!(out, "# Generated: {}", self.context.generated)?;
        writeln!(out)?;

        for point in points {
            writeln!(out, "{} {} {}", point.x, point.y, point.z)?;
        }
        out.flush()?;
        Ok(points.len())
    }

    /// Write present lattice nodes in lattice order.
    pub fn write_grid<W: Write>(&self, lattice: &Lattice, out: &mut W) -> Result<usize> {
        let count = lattice.node_count();
        writeln!(out, "# Grid coordinates")?;
        writeln!(out, "# Format: X Y Z (meters)")?;
        writeln!(out, "# Records: {}", count)?;
        writeln!(
            out,
            "# Lattice: {} x {} from {}",
            lattice.x_count(),
            lattice.y_count(),
            self.context.source_name
        )?;
        writeln!(out, "# Generated: {}", self.context.generated)?;
        writeln!(out)?;

        for node in lattice.nodes() {
            writeln!(out, "{} {} {}", node.x, node.y, node.elevation)?;
        }
        out.flush()?;
        Ok(count)
    }

    /// Export to `<stem>_original_coords.txt` and, with a lattice,
    /// `<stem>_grid_coords.txt` inside `dir`.
    pub fn export_to_dir(
        &self,
        dir: &Path,
        stem: &str,
        points: &PointSet,
        lattice: Option<&Lattice>,
    ) -> Result<ExportFiles> {
        let original = dir.join(format!("{}_original_coords.txt", stem));
        let original_points = write_atomically(&original, |out| self.write_points(points, out))?;
        info!("Exported {} original points to {}", original_points, original.display());

        let (grid, grid_nodes) = match lattice {
            Some(lattice) => {
                let path = dir.join(format!("{}_grid_coords.txt", stem));
                let count = write_atomically(&path, |out| self.write_grid(lattice, out))?;
                info!("Exported {} grid points to {}", count, path.display());
                (Some(path), Some(count))
            }
            None => (None, None),
        };

        Ok(ExportFiles {
            original,
            grid,
            counts: ExportCounts {
                original_points,
                grid_nodes,
            },
        })
    }
}

/// Write through a sibling temporary file and rename it into place.
/// The file at `path` only ever holds a complete write; on error the
/// temporary file is removed and `path` is left untouched.
pub fn write_atomically<T, F>(path: &Path, write: F) -> Result<T>
where
    F: FnOnce(&mut BufWriter<File>) -> Result<T>,
{
    let mut tmp_name = path.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = PathBuf::from(tmp_name);

    let result = File::create(&tmp)
        .map_err(|e| TerrainError::io(&tmp, e))
        .and_then(|file| {
            let mut out = BufWriter::new(file);
            write(&mut out).map_err(|err| match err {
                TerrainError::Stream(source) => TerrainError::io(&tmp, source),
                other => other,
            })
        })
        .and_then(|value| {
            fs::rename(&tmp, path)
                .map(|_| value)
                .map_err(|e| TerrainError::io(path, e))
        });

    if result.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    result
}
