//! Source survey points as parsed from XYZ records.
use serde::{Deserialize, Serialize};

/// One surveyed terrain sample in source units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SourcePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl SourcePoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Distance to a planar coordinate, elevation ignored.
    pub fn planar_distance(&self, x: f64, y: f64) -> f64 {
        ((self.x - x).powi(2) + (self.y - y).powi(2)).sqrt()
    }
}

/// Ordered point collection, file order preserved.
/// Never mutated after construction; filtering builds a new set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointSet {
    points: Vec<SourcePoint>,
}

impl PointSet {
    pub fn new(points: Vec<SourcePoint>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn as_slice(&self) -> &[SourcePoint] {
        &self.points
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SourcePoint> {
        self.points.iter()
    }
}

impl From<Vec<SourcePoint>> for PointSet {
    fn from(points: Vec<SourcePoint>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<SourcePoint> for PointSet {
    fn from_iter<I: IntoIterator<Item = SourcePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a SourcePoint;
    type IntoIter = std::slice::Iter<'a, SourcePoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
