//! Radius-bounded inverse distance weighting over planar coordinates.
//!
//! Candidates within the search radius are ordered by (distance, source
//! index), so equidistant points always resolve to the lowest index. The
//! bucket index in [`Interpolator`] only changes how candidates are found,
//! never which ones are selected or the order they are summed in.
use crate::error::{Result, TerrainError};
use crate::point::{PointSet, SourcePoint};
use constants::interpolation::{
    DEFAULT_COINCIDENT_DISTANCE, DEFAULT_MAX_NEIGHBOURS, DEFAULT_SEARCH_RADIUS,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Tunables for the weighted estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IdwParams {
    /// Inclusive planar cutoff for neighbour candidates.
    pub search_radius: f64,
    /// Closest candidates that take part in the weighted sum.
    pub max_neighbours: usize,
    /// Distance under which a candidate's elevation is returned as-is.
    pub coincident_distance: f64,
}

impl Default for IdwParams {
    fn default() -> Self {
        Self {
            search_radius: DEFAULT_SEARCH_RADIUS,
            max_neighbours: DEFAULT_MAX_NEIGHBOURS,
            coincident_distance: DEFAULT_COINCIDENT_DISTANCE,
        }
    }
}

impl IdwParams {
    pub fn validate(&self) -> Result<()> {
        if !(self.search_radius.is_finite() && self.search_radius > 0.0) {
            return Err(TerrainError::InvalidConfiguration(format!(
                "search radius must be finite and greater than 0, got {}",
                self.search_radius
            )));
        }
        if self.max_neighbours == 0 {
            return Err(TerrainError::InvalidConfiguration(
                "max neighbours must be at least 1".to_string(),
            ));
        }
        if !(self.coincident_distance.is_finite() && self.coincident_distance >= 0.0) {
            return Err(TerrainError::InvalidConfiguration(format!(
                "coincident distance must be finite and not negative, got {}",
                self.coincident_distance
            )));
        }
        Ok(())
    }
}

/// How an elevation estimate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeSource {
    /// Copied verbatim from one source point.
    Exact,
    /// Weighted mean of several source points.
    Interpolated,
}

/// Elevation estimate with provenance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Estimate {
    pub elevation: f64,
    pub source: NodeSource,
}

impl Estimate {
    fn exact(point: &SourcePoint) -> Self {
        Self {
            elevation: point.z,
            source: NodeSource::Exact,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    distance: f64,
}

/// Estimate elevation at `(x, y)` with default parameters by scanning every point.
pub fn interpolate(points: &PointSet, x: f64, y: f64) -> Result<f64> {
    estimate(points, x, y, &IdwParams::default()).map(|e| e.elevation)
}

/// Brute-force estimate; O(n) per query.
pub fn estimate(points: &PointSet, x: f64, y: f64, params: &IdwParams) -> Result<Estimate> {
    params.validate()?;
    let slice = points.as_slice();
    if slice.is_empty() {
        return Err(TerrainError::NoData);
    }

    let candidates = scan_all(slice, x, y, params.search_radius);
    Ok(resolve(slice, candidates, x, y, params))
}

fn scan_all(points: &[SourcePoint], x: f64, y: f64, radius: f64) -> Vec<Candidate> {
    points
        .iter()
        .enumerate()
        .filter_map(|(index, p)| {
            let distance = p.planar_distance(x, y);
            (distance <= radius).then_some(Candidate { index, distance })
        })
        .collect()
}

/// Shared selection and weighting once radius candidates are known.
fn resolve(
    points: &[SourcePoint],
    mut candidates: Vec<Candidate>,
    x: f64,
    y: f64,
    params: &IdwParams,
) -> Estimate {
    if candidates.is_empty() {
        return Estimate::exact(&points[nearest_index(points, x, y)]);
    }

    if candidates.len() == 1 {
        return Estimate::exact(&points[candidates[0].index]);
    }

    candidates.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.index.cmp(&b.index))
    });
    candidates.truncate(params.max_neighbours);

    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for candidate in &candidates {
        let point = &points[candidate.index];
        if candidate.distance < params.coincident_distance {
            return Estimate::exact(point);
        }
        let weight = 1.0 / (candidate.distance * candidate.distance);
        weighted_sum += point.z * weight;
        total_weight += weight;
    }

    Estimate {
        elevation: weighted_sum / total_weight,
        source: NodeSource::Interpolated,
    }
}

/// Globally nearest point; ties go to the lowest index.
fn nearest_index(points: &[SourcePoint], x: f64, y: f64) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, point) in points.iter().enumerate() {
        let distance = point.planar_distance(x, y);
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}

/// Largest cell coordinate used as a bucket key. Beyond it the float
/// ratio is too coarse to place points reliably within one cell.
const MAX_CELL_COORD: f64 = (1u64 << 40) as f64;

/// Interpolator over a fixed point set with a sparse bucket index.
/// Bucket edge equals the search radius, so a query touches a small
/// neighbourhood of cells instead of every point. Footprints too large
/// for the radius to key are scanned in full instead.
pub struct Interpolator<'a> {
    points: &'a [SourcePoint],
    params: IdwParams,
    origin: (f64, f64),
    cell_size: f64,
    /// `None` when some point falls outside the keyable cell range.
    buckets: Option<HashMap<(i64, i64), Vec<usize>>>,
}

impl<'a> Interpolator<'a> {
    pub fn new(points: &'a PointSet, params: IdwParams) -> Result<Self> {
        params.validate()?;
        let slice = points.as_slice();
        let first = slice.first().ok_or(TerrainError::NoData)?;

        let origin = (first.x, first.y);
        let cell_size = params.search_radius;
        let mut buckets: HashMap<(i64, i64), Vec<usize>> = HashMap::new();
        let mut keyable = true;
        for (index, point) in slice.iter().enumerate() {
            let Some(key) = cell_key(origin, cell_size, point.x, point.y) else {
                keyable = false;
                break;
            };
            buckets.entry(key).or_default().push(index);
        }

        let buckets = if keyable {
            debug!("Bucket index: {} cells for {} points", buckets.len(), slice.len());
            Some(buckets)
        } else {
            debug!("Footprint too large for radius {}, scanning every point", cell_size);
            None
        };

        Ok(Self {
            points: slice,
            params,
            origin,
            cell_size,
            buckets,
        })
    }

    /// Occupied buckets, 0 when queries scan every point.
    pub fn bucket_count(&self) -> usize {
        self.buckets.as_ref().map_or(0, HashMap::len)
    }

    pub fn estimate(&self, x: f64, y: f64) -> Estimate {
        let radius = self.params.search_radius;
        let candidates = match self.bucket_candidates(x, y) {
            Some(candidates) => candidates,
            None => scan_all(self.points, x, y, radius),
        };
        resolve(self.points, candidates, x, y, &self.params)
    }

    /// Radius candidates from neighbouring buckets, `None` if the query
    /// window cannot be keyed.
    fn bucket_candidates(&self, x: f64, y: f64) -> Option<Vec<Candidate>> {
        let buckets = self.buckets.as_ref()?;
        let radius = self.params.search_radius;
        // One extra ring absorbs rounding at cell borders.
        let (min_cx, min_cy) = cell_key(self.origin, self.cell_size, x - radius, y - radius)?;
        let (max_cx, max_cy) = cell_key(self.origin, self.cell_size, x + radius, y + radius)?;

        let mut candidates = Vec::new();
        for cx in (min_cx - 1)..=(max_cx + 1) {
            for cy in (min_cy - 1)..=(max_cy + 1) {
                let Some(bucket) = buckets.get(&(cx, cy)) else {
                    continue;
                };
                for &index in bucket {
                    let distance = self.points[index].planar_distance(x, y);
                    if distance <= radius {
                        candidates.push(Candidate { index, distance });
                    }
                }
            }
        }
        Some(candidates)
    }
}

fn cell_key(origin: (f64, f64), cell_size: f64, x: f64, y: f64) -> Option<(i64, i64)> {
    let coord = |v: f64, o: f64| {
        let c = ((v - o) / cell_size).floor();
        (c.abs() <= MAX_CELL_COORD).then_some(c as i64)
    };
    Some((coord(x, origin.0)?, coord(y, origin.1)?))
}
