//! Point set coordinate bounds and elevation filtering
use crate::error::{Result, TerrainError};
use crate::point::{PointSet, SourcePoint};
use constants::grid::BOUNDS_CHUNK_SIZE;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub max_x: f64,
    pub min_y: f64,
    pub max_y: f64,
    pub min_z: f64,
    pub max_z: f64,
}

impl Bounds {
    /// Bounds enclosing every point. Fails on an empty set rather than
    /// returning infinite placeholders.
    pub fn from_points(points: &PointSet) -> Result<Self> {
        if points.is_empty() {
            return Err(TerrainError::EmptySet { stage: "bounds" });
        }

        let bounds = points
            .as_slice()
            .par_chunks(BOUNDS_CHUNK_SIZE)
            .map(|chunk| {
                let mut local = Accumulator::new();
                for point in chunk {
                    local.update(point);
                }
                local
            })
            .reduce(Accumulator::new, Accumulator::merge);

        Ok(bounds.finish())
    }

    /// Planar footprint and elevation range as (width, height, relief).
    pub fn dimensions(&self) -> (f64, f64, f64) {
        (
            self.max_x - self.min_x,
            self.max_y - self.min_y,
            self.max_z - self.min_z,
        )
    }

    pub fn contains(&self, point: &SourcePoint) -> bool {
        (self.min_x..=self.max_x).contains(&point.x)
            && (self.min_y..=self.max_y).contains(&point.y)
            && (self.min_z..=self.max_z).contains(&point.z)
    }
}

/// Running min/max, seeded with infinities until the first point.
#[derive(Clone, Copy)]
struct Accumulator {
    min: [f64; 3],
    max: [f64; 3],
}

impl Accumulator {
    fn new() -> Self {
        Self {
            min: [f64::INFINITY; 3],
            max: [f64::NEG_INFINITY; 3],
        }
    }

    fn update(&mut self, point: &SourcePoint) {
        for (axis, value) in [point.x, point.y, point.z].into_iter().enumerate() {
            self.min[axis] = self.min[axis].min(value);
            self.max[axis] = self.max[axis].max(value);
        }
    }

    fn merge(mut self, other: Self) -> Self {
        for axis in 0..3 {
            self.min[axis] = self.min[axis].min(other.min[axis]);
            self.max[axis] = self.max[axis].max(other.max[axis]);
        }
        self
    }

    fn finish(self) -> Bounds {
        Bounds {
            min_x: self.min[0],
            max_x: self.max[0],
            min_y: self.min[1],
            max_y: self.max[1],
            min_z: self.min[2],
            max_z: self.max[2],
        }
    }
}

/// Convenience wrapper over [`Bounds::from_points`].
pub fn bounds(points: &PointSet) -> Result<Bounds> {
    Bounds::from_points(points)
}

/// Keep points with `min_z <= z <= max_z`, preserving order.
/// An empty result is valid; callers check before further use.
pub fn filter_by_elevation(points: &PointSet, min_z: f64, max_z: f64) -> PointSet {
    points
        .iter()
        .filter(|p| p.z >= min_z && p.z <= max_z)
        .copied()
        .collect()
}
