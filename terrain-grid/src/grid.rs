//! Regular lattice over a point set footprint with interpolated elevations
use crate::bounds::Bounds;
use crate::error::{Result, TerrainError};
use crate::interpolation::{IdwParams, Interpolator, NodeSource};
use crate::point::PointSet;
use constants::grid::MAX_GRID_NODES;
use indicatif::ProgressBar;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

/// One lattice node in source units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridNode {
    /// Lattice index along X.
    pub i: usize,
    /// Lattice index along Y.
    pub j: usize,
    pub x: f64,
    pub y: f64,
    pub elevation: f64,
    pub source: NodeSource,
}

impl GridNode {
    pub fn position(&self) -> [f64; 3] {
        [self.x, self.y, self.elevation]
    }
}

/// Dense or partial 2D lattice, slots ordered by `i`, then `j`.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    x_count: usize,
    y_count: usize,
    nodes: Vec<Option<GridNode>>,
}

impl Lattice {
    /// Lattice with every slot vacant, subject to the node limit.
    pub fn empty(x_count: usize, y_count: usize) -> Result<Self> {
        let total = checked_node_count(x_count, y_count)?;
        Ok(Self {
            x_count,
            y_count,
            nodes: vec![None; total],
        })
    }

    fn from_columns(x_count: usize, y_count: usize, columns: Vec<Vec<GridNode>>) -> Self {
        let nodes = columns.into_iter().flatten().map(Some).collect();
        Self {
            x_count,
            y_count,
            nodes,
        }
    }

    pub fn x_count(&self) -> usize {
        self.x_count
    }

    pub fn y_count(&self) -> usize {
        self.y_count
    }

    fn slot(&self, i: usize, j: usize) -> Option<usize> {
        (i < self.x_count && j < self.y_count).then(|| i * self.y_count + j)
    }

    pub fn get(&self, i: usize, j: usize) -> Option<&GridNode> {
        self.slot(i, j).and_then(|s| self.nodes[s].as_ref())
    }

    /// Place a node at its own `(i, j)`. Out-of-range nodes are returned back.
    pub fn insert(&mut self, node: GridNode) -> std::result::Result<(), GridNode> {
        match self.slot(node.i, node.j) {
            Some(s) => {
                self.nodes[s] = Some(node);
                Ok(())
            }
            None => Err(node),
        }
    }

    /// Present nodes in row-major order (`i` outer, `j` inner).
    pub fn nodes(&self) -> impl Iterator<Item = &GridNode> {
        self.nodes.iter().flatten()
    }

    pub fn node_count(&self) -> usize {
        self.nodes().count()
    }

    pub fn count_by_source(&self, source: NodeSource) -> usize {
        self.nodes().filter(|n| n.source == source).count()
    }
}

/// Output of one grid generation call.
#[derive(Debug, Clone)]
pub struct GridResult {
    pub lattice: Lattice,
    /// Bounds of the source points the lattice was laid over.
    pub bounds: Bounds,
    pub spacing: f64,
}

impl GridResult {
    pub fn x_count(&self) -> usize {
        self.lattice.x_count()
    }

    pub fn y_count(&self) -> usize {
        self.lattice.y_count()
    }
}

/// Lattice dimensions for a footprint, at least one node per axis.
pub fn lattice_dimensions(bounds: &Bounds, spacing: f64) -> (usize, usize) {
    let (width, height, _) = bounds.dimensions();
    (
        ((width / spacing).floor() as usize).saturating_add(1),
        ((height / spacing).floor() as usize).saturating_add(1),
    )
}

/// Node count of an `x_count` by `y_count` lattice, rejected above
/// `MAX_GRID_NODES`.
pub fn checked_node_count(x_count: usize, y_count: usize) -> Result<usize> {
    match x_count.checked_mul(y_count) {
        Some(total) if total <= MAX_GRID_NODES => Ok(total),
        _ => Err(TerrainError::InvalidConfiguration(format!(
            "a {}x{} lattice is above the {} node limit",
            x_count, y_count, MAX_GRID_NODES
        ))),
    }
}

/// Lays a regular lattice over a point set and interpolates every node.
pub struct GridBuilder {
    spacing: f64,
    params: IdwParams,
    progress: ProgressBar,
}

impl GridBuilder {
    pub fn new(spacing: f64) -> Self {
        Self {
            spacing,
            params: IdwParams::default(),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_params(mut self, params: IdwParams) -> Self {
        self.params = params;
        self
    }

    /// Report one tick per finished lattice column.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn build(&self, points: &PointSet) -> Result<GridResult> {
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(TerrainError::InvalidSpacing(self.spacing));
        }
        self.params.validate()?;
        if points.is_empty() {
            return Err(TerrainError::EmptySet {
                stage: "grid generation",
            });
        }

        let bounds = Bounds::from_points(points)?;
        let (width, height, relief) = bounds.dimensions();
        info!(
            "Grid bounds: X {} to {} ({:.2}), Y {} to {} ({:.2}), Z {} to {} ({:.2})",
            bounds.min_x,
            bounds.max_x,
            width,
            bounds.min_y,
            bounds.max_y,
            height,
            bounds.min_z,
            bounds.max_z,
            relief
        );

        let (x_count, y_count) = lattice_dimensions(&bounds, self.spacing);
        checked_node_count(x_count, y_count)?;
        info!("Creating {} x {} terrain-following grid", x_count, y_count);

        let interpolator = Interpolator::new(points, self.params)?;
        debug!(
            "Interpolating with {} occupied buckets",
            interpolator.bucket_count()
        );
        self.progress.set_length(x_count as u64);

        let columns: Vec<Vec<GridNode>> = (0..x_count)
            .into_par_iter()
            .map(|i| {
                let x = bounds.min_x + i as f64 * self.spacing;
                let column = (0..y_count)
                    .map(|j| {
                        let y = bounds.min_y + j as f64 * self.spacing;
                        let estimate = interpolator.estimate(x, y);
                        GridNode {
                            i,
                            j,
                            x,
                            y,
                            elevation: estimate.elevation,
                            source: estimate.source,
                        }
                    })
                    .collect();
                self.progress.inc(1);
                column
            })
            .collect();

        self.progress.finish_with_message("Grid interpolated");

        Ok(GridResult {
            lattice: Lattice::from_columns(x_count, y_count, columns),
            bounds,
            spacing: self.spacing,
        })
    }
}

/// Build a lattice with default interpolation parameters.
pub fn build_grid(points: &PointSet, spacing: f64) -> Result<GridResult> {
    GridBuilder::new(spacing).build(points)
}
