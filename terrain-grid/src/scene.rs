//! Output records for the host scene.
//!
//! The core hands the host a closed set of records (line, marker,
//! triangle) with explicit tags. Conversion to display units happens only
//! here; every tag still carries the original source coordinates.
use crate::error::{Result, TerrainError};
use crate::export::write_atomically;
use crate::grid::{GridResult, Lattice};
use crate::interpolation::Interpolator;
use crate::layout::{CoordinateGrid, SurveyGrid};
use crate::mesh::{CellId, Triangle};
use crate::point::PointSet;
use constants::coordinate_system::display_factor;
use constants::grid::{
    LABEL_INTERVAL_DIVISOR, LABEL_INTERVAL_MAX, LABEL_INTERVAL_MIN, STATION_START, STATION_STEP,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Display scaling applied to positions handed to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayScale {
    /// Metres to host inches, no further reduction.
    #[default]
    Preserved,
    /// Metres to host inches at one tenth size.
    Legacy,
}

impl DisplayScale {
    pub fn factor(self) -> f64 {
        display_factor(self == DisplayScale::Legacy)
    }

    pub fn apply(self, position: [f64; 3]) -> [f64; 3] {
        let f = self.factor();
        [position[0] * f, position[1] * f, position[2] * f]
    }
}

/// Rendering weight hint for grid lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    Thin,
    #[default]
    Normal,
    Thick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineDirection {
    /// Runs along Y at a fixed X.
    Vertical,
    /// Runs along X at a fixed Y.
    Horizontal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineTag {
    pub direction: LineDirection,
    /// Original X of a vertical line or original Y of a horizontal one.
    pub axis_value: f64,
    pub spacing: f64,
    pub style: LineStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarkerTag {
    /// An ingested source point, `point_id` is 1-based.
    SourcePoint { point_id: usize, original: [f64; 3] },
    /// Coordinate label at a lattice node.
    Label { text: String, original: [f64; 3] },
    /// Survey station placed on a source point.
    Station { name: String, original: [f64; 3] },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FaceTag {
    pub cell: String,
    /// Original coordinates of the cell's low-low corner.
    pub anchor: [f64; 3],
}

/// One item handed to the host, positions in display units.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SceneRecord {
    Line {
        start: [f64; 3],
        end: [f64; 3],
        tag: LineTag,
    },
    Marker {
        position: [f64; 3],
        tag: MarkerTag,
    },
    Triangle {
        corners: [[f64; 3]; 3],
        tag: FaceTag,
    },
}

/// Consumer of scene records.
pub trait SceneSink {
    fn emit(&mut self, record: SceneRecord) -> Result<()>;
}

/// Keeps every record in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub records: Vec<SceneRecord>,
}

impl SceneSink for RecordingSink {
    fn emit(&mut self, record: SceneRecord) -> Result<()> {
        self.records.push(record);
        Ok(())
    }
}

/// Writes one JSON object per record and line.
pub struct JsonLinesSink<W: Write> {
    out: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn finish(mut self) -> Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}

impl<W: Write> SceneSink for JsonLinesSink<W> {
    fn emit(&mut self, record: SceneRecord) -> Result<()> {
        serde_json::to_writer(&mut self.out, &record).map_err(|e| {
            if e.is_io() {
                TerrainError::Stream(e.into())
            } else {
                TerrainError::Json(e)
            }
        })?;
        self.out.write_all(b"\n")?;
        Ok(())
    }
}

/// Discards records; used when only counts are wanted.
#[derive(Debug, Default)]
pub struct NullSink;

impl SceneSink for NullSink {
    fn emit(&mut self, _record: SceneRecord) -> Result<()> {
        Ok(())
    }
}

/// Run `run` against a JSON lines sink at `path`, or a [`NullSink`]
/// without one. The file appears only if `run` succeeds.
pub fn record_scene<T>(
    path: Option<&Path>,
    run: impl FnOnce(&mut dyn SceneSink) -> Result<T>,
) -> Result<T> {
    let Some(path) = path else {
        return run(&mut NullSink);
    };
    let value = write_atomically(path, |out| {
        let mut sink = JsonLinesSink::new(out);
        let value = run(&mut sink)?;
        sink.finish()?;
        Ok(value)
    })?;
    info!("Scene records written to {}", path.display());
    Ok(value)
}

/// Records emitted per kind.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SceneSummary {
    pub source_markers: usize,
    pub grid_lines: usize,
    pub faces: usize,
    pub labels: usize,
    pub stations: usize,
}

impl SceneSummary {
    pub fn total(&self) -> usize {
        self.source_markers + self.grid_lines + self.faces + self.labels + self.stations
    }
}

/// Turns core results into scene records for one sink.
pub struct SceneEmitter<'s> {
    sink: &'s mut dyn SceneSink,
    scale: DisplayScale,
    summary: SceneSummary,
}

impl<'s> SceneEmitter<'s> {
    pub fn new(sink: &'s mut dyn SceneSink, scale: DisplayScale) -> Self {
        Self {
            sink,
            scale,
            summary: SceneSummary::default(),
        }
    }

    pub fn summary(&self) -> SceneSummary {
        self.summary
    }

    /// One marker per source point.
    pub fn source_points(&mut self, points: &PointSet) -> Result<usize> {
        for (index, point) in points.iter().enumerate() {
            let original = [point.x, point.y, point.z];
            self.sink.emit(SceneRecord::Marker {
                position: self.scale.apply(original),
                tag: MarkerTag::SourcePoint {
                    point_id: index + 1,
                    original,
                },
            })?;
        }
        self.summary.source_markers += points.len();
        Ok(points.len())
    }

    /// Terrain-following segments between lattice neighbours: every column
    /// first, then every row.
    pub fn grid_lines(&mut self, grid: &GridResult, style: LineStyle) -> Result<usize> {
        let lattice = &grid.lattice;
        let mut emitted = 0;

        for i in 0..lattice.x_count() {
            let axis_value = grid.bounds.min_x + i as f64 * grid.spacing;
            for j in 1..lattice.y_count() {
                let (Some(a), Some(b)) = (lattice.get(i, j - 1), lattice.get(i, j)) else {
                    continue;
                };
                self.line(a.position(), b.position(), LineTag {
                    direction: LineDirection::Vertical,
                    axis_value,
                    spacing: grid.spacing,
                    style,
                })?;
                emitted += 1;
            }
        }

        for j in 0..lattice.y_count() {
            let axis_value = grid.bounds.min_y + j as f64 * grid.spacing;
            for i in 1..lattice.x_count() {
                let (Some(a), Some(b)) = (lattice.get(i - 1, j), lattice.get(i, j)) else {
                    continue;
                };
                self.line(a.position(), b.position(), LineTag {
                    direction: LineDirection::Horizontal,
                    axis_value,
                    spacing: grid.spacing,
                    style,
                })?;
                emitted += 1;
            }
        }

        self.summary.grid_lines += emitted;
        Ok(emitted)
    }

    fn line(&mut self, start: [f64; 3], end: [f64; 3], tag: LineTag) -> Result<()> {
        self.sink.emit(SceneRecord::Line {
            start: self.scale.apply(start),
            end: self.scale.apply(end),
            tag,
        })
    }

    /// One triangle record per mesh triangle with present corners.
    pub fn faces(&mut self, lattice: &Lattice, triangles: &[Triangle]) -> Result<usize> {
        let mut emitted = 0;
        for triangle in triangles {
            let Some(corners) = triangle.positions(lattice) else {
                continue;
            };
            self.sink.emit(SceneRecord::Triangle {
                corners: corners.map(|c| self.scale.apply(c)),
                tag: face_tag(triangle.cell, corners[0]),
            })?;
            emitted += 1;
        }
        self.summary.faces += emitted;
        Ok(emitted)
    }

    /// Coordinate labels on a sparse subset of lattice nodes.
    pub fn labels(&mut self, lattice: &Lattice) -> Result<usize> {
        let step = label_interval(lattice.x_count());
        let mut emitted = 0;
        for i in (0..lattice.x_count()).step_by(step) {
            for j in (0..lattice.y_count()).step_by(step) {
                let Some(node) = lattice.get(i, j) else {
                    continue;
                };
                let original = node.position();
                self.sink.emit(SceneRecord::Marker {
                    position: self.scale.apply(original),
                    tag: MarkerTag::Label {
                        text: format!("{:.2},{:.2},{:.2}", node.x, node.y, node.elevation),
                        original,
                    },
                })?;
                emitted += 1;
            }
        }
        self.summary.labels += emitted;
        Ok(emitted)
    }

    /// Station markers on every `interval`-th source point.
    pub fn stations(&mut self, points: &PointSet, interval: usize, prefix: &str) -> Result<usize> {
        if interval == 0 {
            return Err(TerrainError::InvalidConfiguration(
                "station interval must be at least 1".to_string(),
            ));
        }
        let mut emitted = 0;
        let numbers = station_numbers(STATION_START, STATION_STEP);
        for (point, number) in points.iter().step_by(interval).zip(numbers) {
            let original = [point.x, point.y, point.z];
            self.sink.emit(SceneRecord::Marker {
                position: self.scale.apply(original),
                tag: MarkerTag::Station {
                    name: format!("{}{}", prefix, number),
                    original,
                },
            })?;
            emitted += 1;
        }
        self.summary.stations += emitted;
        Ok(emitted)
    }

    /// Flat coordinate grid with axis and corner labels.
    pub fn coordinate_grid(&mut self, grid: &CoordinateGrid) -> Result<usize> {
        grid.validate()?;
        let (x_lines, y_lines) = grid.line_counts();
        let (sx, sy) = grid.start;
        let mut labels = 0;

        for i in 0..x_lines {
            let x = sx + i as f64 * grid.spacing;
            self.line([x, sy, 0.0], [x, sy + grid.height, 0.0], LineTag {
                direction: LineDirection::Vertical,
                axis_value: x,
                spacing: grid.spacing,
                style: grid.style,
            })?;
            if grid.show_labels && i % grid.label_every == 0 {
                self.label(format!("{:.1}", x), [x, sy, 0.0])?;
                labels += 1;
            }
        }

        for j in 0..y_lines {
            let y = sy + j as f64 * grid.spacing;
            self.line([sx, y, 0.0], [sx + grid.width, y, 0.0], LineTag {
                direction: LineDirection::Horizontal,
                axis_value: y,
                spacing: grid.spacing,
                style: grid.style,
            })?;
            if grid.show_labels && j % grid.label_every == 0 {
                self.label(format!("{:.1}", y), [sx, y, 0.0])?;
                labels += 1;
            }
        }

        if grid.show_labels {
            let (ex, ey) = (sx + grid.width, sy + grid.height);
            for (x, y) in [(sx, sy), (ex, sy), (sx, ey), (ex, ey)] {
                self.label(format!("{},{}", x, y), [x, y, 0.0])?;
                labels += 1;
            }
        }

        self.summary.grid_lines += x_lines + y_lines;
        self.summary.labels += labels;
        Ok(x_lines + y_lines)
    }

    /// Survey lattice: one thin line per station row and column, then a
    /// numbered station at every node. Elevations come from `surface`
    /// when given and are 0 otherwise.
    pub fn survey_grid(
        &mut self,
        grid: &SurveyGrid,
        surface: Option<&Interpolator<'_>>,
    ) -> Result<usize> {
        grid.validate()?;
        let (nx, ny) = (grid.stations_x, grid.stations_y);
        let step = grid.station_interval();
        let (last_x, last_y) = grid.position(nx - 1, ny - 1);

        for i in 0..nx {
            let (x, y0) = grid.position(i, 0);
            self.line([x, y0, 0.0], [x, last_y, 0.0], LineTag {
                direction: LineDirection::Vertical,
                axis_value: x,
                spacing: step,
                style: LineStyle::Thin,
            })?;
        }
        for j in 0..ny {
            let (x0, y) = grid.position(0, j);
            self.line([x0, y, 0.0], [last_x, y, 0.0], LineTag {
                direction: LineDirection::Horizontal,
                axis_value: y,
                spacing: step,
                style: LineStyle::Thin,
            })?;
        }
        self.summary.grid_lines += nx + ny;

        let mut numbers = station_numbers(grid.start_station, 1);
        let mut emitted = 0;
        for j in 0..ny {
            for i in 0..nx {
                let (x, y) = grid.position(i, j);
                let z = surface.map_or(0.0, |s| s.estimate(x, y).elevation);
                let number = numbers.next().unwrap_or(u64::MAX);
                let original = [x, y, z];
                self.sink.emit(SceneRecord::Marker {
                    position: self.scale.apply(original),
                    tag: MarkerTag::Station {
                        name: number.to_string(),
                        original,
                    },
                })?;
                emitted += 1;
            }
        }
        self.summary.stations += emitted;
        Ok(emitted)
    }

    fn label(&mut self, text: String, original: [f64; 3]) -> Result<()> {
        self.sink.emit(SceneRecord::Marker {
            position: self.scale.apply(original),
            tag: MarkerTag::Label { text, original },
        })
    }
}

/// Station numbers from `start` in steps of `step`, pinned at `u64::MAX`.
fn station_numbers(start: u64, step: u64) -> impl Iterator<Item = u64> {
    std::iter::successors(Some(start), move |n| Some(n.saturating_add(step)))
}

fn face_tag(cell: CellId, anchor: [f64; 3]) -> FaceTag {
    FaceTag {
        cell: cell.to_string(),
        anchor,
    }
}

/// Label step along both axes for a lattice `x_count` nodes wide.
pub fn label_interval(x_count: usize) -> usize {
    (x_count / LABEL_INTERVAL_DIVISOR).clamp(LABEL_INTERVAL_MIN, LABEL_INTERVAL_MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::build_grid;
    use crate::interpolation::IdwParams;
    use crate::layout::SurveyDensity;
    use crate::mesh::triangulate;
    use crate::point::SourcePoint;
    use approx::assert_relative_eq;
    use constants::coordinate_system::METERS_TO_INCHES;

    fn square() -> PointSet {
        PointSet::new(vec![
            SourcePoint::new(0.0, 0.0, 10.0),
            SourcePoint::new(10.0, 0.0, 12.0),
            SourcePoint::new(0.0, 10.0, 11.0),
            SourcePoint::new(10.0, 10.0, 13.0),
        ])
    }

    #[test]
    fn display_scale_only_touches_positions() {
        let mut sink = RecordingSink::default();
        let mut emitter = SceneEmitter::new(&mut sink, DisplayScale::Preserved);
        emitter.source_points(&square()).unwrap();

        let SceneRecord::Marker { position, tag } = &sink.records[1] else {
            panic!("expected marker");
        };
        assert_relative_eq!(position[0], 10.0 * METERS_TO_INCHES);
        assert_eq!(
            tag,
            &MarkerTag::SourcePoint {
                point_id: 2,
                original: [10.0, 0.0, 12.0]
            }
        );
    }

    #[test]
    fn legacy_scale_is_a_tenth() {
        let p = DisplayScale::Legacy.apply([10.0, 0.0, 0.0]);
        assert_relative_eq!(p[0], METERS_TO_INCHES, epsilon = 1e-9);
    }

    #[test]
    fn grid_line_count_covers_rows_and_columns() {
        let points = square();
        for spacing in [10.0, 5.0, 3.0] {
            let grid = build_grid(&points, spacing).unwrap();
            let (x, y) = (grid.x_count(), grid.y_count());
            let mut emitter_sink = NullSink;
            let mut emitter = SceneEmitter::new(&mut emitter_sink, DisplayScale::Preserved);
            let lines = emitter.grid_lines(&grid, LineStyle::Thin).unwrap();
            assert_eq!(lines, x * (y - 1) + y * (x - 1));
        }
    }

    #[test]
    fn grid_lines_carry_original_axis_values() {
        let grid = build_grid(&square(), 10.0).unwrap();
        let mut sink = RecordingSink::default();
        SceneEmitter::new(&mut sink, DisplayScale::Preserved)
            .grid_lines(&grid, LineStyle::Normal)
            .unwrap();

        let tags: Vec<(LineDirection, f64)> = sink
            .records
            .iter()
            .filter_map(|r| match r {
                SceneRecord::Line { tag, .. } => Some((tag.direction, tag.axis_value)),
                _ => None,
            })
            .collect();
        assert_eq!(
            tags,
            vec![
                (LineDirection::Vertical, 0.0),
                (LineDirection::Vertical, 10.0),
                (LineDirection::Horizontal, 0.0),
                (LineDirection::Horizontal, 10.0),
            ]
        );
    }

    #[test]
    fn faces_are_tagged_by_cell() {
        let grid = build_grid(&square(), 10.0).unwrap();
        let triangles = triangulate(&grid.lattice);
        let mut sink = RecordingSink::default();
        let mut emitter = SceneEmitter::new(&mut sink, DisplayScale::Preserved);
        assert_eq!(emitter.faces(&grid.lattice, &triangles).unwrap(), 2);
        assert_eq!(emitter.summary().faces, 2);

        let cells: Vec<&str> = sink
            .records
            .iter()
            .filter_map(|r| match r {
                SceneRecord::Triangle { tag, .. } => Some(tag.cell.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(cells, vec!["0_0_1", "0_0_2"]);
    }

    #[test]
    fn label_interval_is_clamped() {
        assert_eq!(label_interval(0), 1);
        assert_eq!(label_interval(9), 1);
        assert_eq!(label_interval(30), 3);
        assert_eq!(label_interval(500), 5);
    }

    #[test]
    fn labels_round_to_two_decimals() {
        let points = PointSet::new(vec![
            SourcePoint::new(0.0, 0.0, 1.23456),
            SourcePoint::new(2.0, 2.0, 1.0),
        ]);
        let grid = build_grid(&points, 1.0).unwrap();
        let mut sink = RecordingSink::default();
        let labels = SceneEmitter::new(&mut sink, DisplayScale::Preserved)
            .labels(&grid.lattice)
            .unwrap();
        assert_eq!(labels, 9);
        let SceneRecord::Marker {
            tag: MarkerTag::Label { text, .. },
            ..
        } = &sink.records[0]
        else {
            panic!("expected label");
        };
        assert_eq!(text, "0.00,0.00,1.23");
    }

    #[test]
    fn stations_are_numbered_from_one_thousand_in_tens() {
        let points: PointSet = (0..7).map(|i| SourcePoint::new(i as f64, 0.0, 0.0)).collect();
        let mut sink = RecordingSink::default();
        let count = SceneEmitter::new(&mut sink, DisplayScale::Preserved)
            .stations(&points, 3, "STA")
            .unwrap();
        assert_eq!(count, 3);
        let names: Vec<String> = sink
            .records
            .iter()
            .filter_map(|r| match r {
                SceneRecord::Marker {
                    tag: MarkerTag::Station { name, .. },
                    ..
                } => Some(name.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(names, vec!["STA1000", "STA1010", "STA1020"]);
    }

    #[test]
    fn json_lines_sink_writes_one_object_per_record() {
        let mut sink = JsonLinesSink::new(Vec::new());
        SceneEmitter::new(&mut sink, DisplayScale::Preserved)
            .source_points(&square())
            .unwrap();
        let bytes = sink.finish().unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text.lines().count(), 4);
        let first: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert_eq!(first["type"], "marker");
        assert_eq!(first["tag"]["kind"], "source_point");
        assert_eq!(first["tag"]["point_id"], 1);
    }

    fn label_texts(records: &[SceneRecord]) -> Vec<String> {
        records
            .iter()
            .filter_map(|r| match r {
                SceneRecord::Marker {
                    tag: MarkerTag::Label { text, .. },
                    ..
                } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn coordinate_grid_labels_axes_and_corners() {
        let grid = CoordinateGrid {
            width: 30.0,
            height: 20.0,
            spacing: 10.0,
            start: (100.0, 200.0),
            label_every: 2,
            ..CoordinateGrid::default()
        };
        let mut sink = RecordingSink::default();
        let mut emitter = SceneEmitter::new(&mut sink, DisplayScale::Preserved);
        assert_eq!(emitter.coordinate_grid(&grid).unwrap(), 7);
        let summary = emitter.summary();
        assert_eq!(summary.grid_lines, 7);
        assert_eq!(summary.labels, 8);

        assert_eq!(
            label_texts(&sink.records),
            vec![
                "100.0", "120.0", "200.0", "220.0", "100,200", "130,200", "100,220", "130,220",
            ]
        );
        let SceneRecord::Line { start, end, .. } = &sink.records[0] else {
            panic!("expected line");
        };
        assert_relative_eq!(start[1], 200.0 * METERS_TO_INCHES);
        assert_relative_eq!(end[1], 220.0 * METERS_TO_INCHES);
    }

    #[test]
    fn coordinate_grid_without_labels_emits_lines_only() {
        let grid = CoordinateGrid {
            show_labels: false,
            ..CoordinateGrid::default()
        };
        let mut sink = RecordingSink::default();
        SceneEmitter::new(&mut sink, DisplayScale::Preserved)
            .coordinate_grid(&grid)
            .unwrap();
        assert_eq!(sink.records.len(), 22);
        assert!(label_texts(&sink.records).is_empty());
    }

    #[test]
    fn survey_grid_numbers_stations_x_fastest() {
        let grid = SurveyGrid {
            interval: 10.0,
            density: SurveyDensity::Coarse,
            stations_x: 3,
            stations_y: 2,
            start_station: 500,
            ..SurveyGrid::default()
        };
        let mut sink = RecordingSink::default();
        let mut emitter = SceneEmitter::new(&mut sink, DisplayScale::Preserved);
        assert_eq!(emitter.survey_grid(&grid, None).unwrap(), 6);
        assert_eq!(emitter.summary().grid_lines, 5);

        let stations: Vec<(String, [f64; 3])> = sink
            .records
            .iter()
            .filter_map(|r| match r {
                SceneRecord::Marker {
                    tag: MarkerTag::Station { name, original },
                    ..
                } => Some((name.clone(), *original)),
                _ => None,
            })
            .collect();
        assert_eq!(stations[0], ("500".to_string(), [0.0, 0.0, 0.0]));
        assert_eq!(stations[2], ("502".to_string(), [40.0, 0.0, 0.0]));
        assert_eq!(stations[3], ("503".to_string(), [0.0, 20.0, 0.0]));
        assert_eq!(stations[5].0, "505");
    }

    #[test]
    fn survey_grid_samples_surface_elevations() {
        let points = square();
        let surface = Interpolator::new(&points, IdwParams::default()).unwrap();
        let grid = SurveyGrid {
            interval: 10.0,
            stations_x: 2,
            stations_y: 2,
            ..SurveyGrid::default()
        };
        let mut sink = RecordingSink::default();
        SceneEmitter::new(&mut sink, DisplayScale::Preserved)
            .survey_grid(&grid, Some(&surface))
            .unwrap();
        let elevations: Vec<f64> = sink
            .records
            .iter()
            .filter_map(|r| match r {
                SceneRecord::Marker {
                    tag: MarkerTag::Station { original, .. },
                    ..
                } => Some(original[2]),
                _ => None,
            })
            .collect();
        assert_eq!(elevations, vec![10.0, 12.0, 11.0, 13.0]);
    }

    #[test]
    fn station_numbers_saturate() {
        let numbers: Vec<u64> = station_numbers(u64::MAX - 15, 10).take(4).collect();
        assert_eq!(
            numbers,
            vec![u64::MAX - 15, u64::MAX - 5, u64::MAX, u64::MAX]
        );
    }

    #[test]
    fn scene_file_is_written_only_on_success() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.jsonl");

        let err = record_scene(Some(&path), |sink| {
            SceneEmitter::new(sink, DisplayScale::Preserved).source_points(&square())?;
            Err::<(), _>(TerrainError::EmptySet { stage: "test" })
        })
        .unwrap_err();
        assert!(matches!(err, TerrainError::EmptySet { .. }));
        assert!(!path.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);

        let count = record_scene(Some(&path), |sink| {
            SceneEmitter::new(sink, DisplayScale::Preserved).source_points(&square())
        })
        .unwrap();
        assert_eq!(count, 4);
        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text.lines().count(), 4);
    }

    #[test]
    fn scene_without_path_is_discarded() {
        let count = record_scene(None, |sink| {
            SceneEmitter::new(sink, DisplayScale::Preserved).source_points(&square())
        })
        .unwrap();
        assert_eq!(count, 4);
    }
}
