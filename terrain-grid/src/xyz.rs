//! Streaming XYZ record reader with subsampling and per-line diagnostics.
use crate::error::{Result, TerrainError};
use crate::point::{PointSet, SourcePoint};
use constants::grid::INGEST_PROGRESS_INTERVAL;
use indicatif::ProgressBar;
use serde::Serialize;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info, warn};

/// Coordinate axis of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        f.write_str(name)
    }
}

/// Why a retained line was rejected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DiagnosticReason {
    /// Fewer than three whitespace separated fields.
    TooFewFields { found: usize },
    /// A coordinate field is not a decimal number.
    InvalidNumber { axis: Axis, token: String },
    /// A coordinate parsed to infinity or NaN.
    NonFinite { axis: Axis },
    /// The line is not valid UTF-8 text.
    InvalidUtf8,
}

impl fmt::Display for DiagnosticReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticReason::TooFewFields { found } => {
                write!(f, "expected at least 3 fields, found {}", found)
            }
            DiagnosticReason::InvalidNumber { axis, token } => {
                write!(f, "{} value '{}' is not a number", axis, token)
            }
            DiagnosticReason::NonFinite { axis } => write!(f, "{} value is not finite", axis),
            DiagnosticReason::InvalidUtf8 => f.write_str("line is not valid UTF-8"),
        }
    }
}

/// A skipped input line. `line` is the 1-based physical line number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineDiagnostic {
    pub line: usize,
    pub reason: DiagnosticReason,
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

/// Outcome of one ingestion call.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub points: PointSet,
    pub diagnostics: Vec<LineDiagnostic>,
    /// Physical lines read, blank and comment lines included.
    pub lines_read: usize,
    /// Non-blank lines kept by the stride, valid or not.
    pub records_sampled: usize,
}

/// Open an XYZ file for buffered line reading.
pub fn open_reader(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| TerrainError::io(path, e))?;
    Ok(BufReader::new(file))
}

/// Read every record of `reader`, keeping non-blank line `k` only when
/// `k % stride == 0`. Blank and `#` comment lines are not counted.
pub fn ingest<R: BufRead>(reader: R, stride: usize) -> Result<Ingested> {
    ingest_with_progress(reader, stride, &ProgressBar::hidden())
}

/// Ingest a file from disk, reporting byte progress on `pb`.
pub fn ingest_file(path: &Path, stride: usize, pb: &ProgressBar) -> Result<Ingested> {
    let reader = open_reader(path)?;
    if let Ok(metadata) = std::fs::metadata(path) {
        pb.set_length(metadata.len());
    }
    info!("Reading XYZ records from {} (stride {})", path.display(), stride);

    ingest_with_progress(reader, stride, pb).map_err(|err| match err {
        TerrainError::Stream(source) => TerrainError::io(path, source),
        other => other,
    })
}

/// Streaming core of [`ingest`]; `pb` position tracks bytes consumed.
pub fn ingest_with_progress<R: BufRead>(
    mut reader: R,
    stride: usize,
    pb: &ProgressBar,
) -> Result<Ingested> {
    if stride == 0 {
        return Err(TerrainError::InvalidConfiguration(
            "stride must be at least 1".to_string(),
        ));
    }

    let mut points = Vec::new();
    let mut diagnostics = Vec::new();
    let mut buf = Vec::new();
    let mut lines_read = 0usize;
    let mut record_index = 0usize;
    let mut records_sampled = 0usize;
    let mut bytes_read = 0u64;

    loop {
        buf.clear();
        let n = reader.read_until(b'\n', &mut buf)?;
        if n == 0 {
            break;
        }
        lines_read += 1;
        bytes_read += n as u64;

        if lines_read % INGEST_PROGRESS_INTERVAL == 0 {
            pb.set_position(bytes_read);
            debug!(
                "Processed {} lines, found {} valid coordinate points",
                lines_read,
                points.len()
            );
        }

        let parsed = match std::str::from_utf8(&buf) {
            Ok(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() || trimmed.starts_with('#') {
                    continue;
                }
                Some(trimmed)
            }
            Err(_) => None,
        };

        let index = record_index;
        record_index += 1;
        if index % stride != 0 {
            continue;
        }
        records_sampled += 1;

        let outcome = match parsed {
            Some(text) => parse_record(text),
            None => Err(DiagnosticReason::InvalidUtf8),
        };

        match outcome {
            Ok(point) => points.push(point),
            Err(reason) => {
                let diagnostic = LineDiagnostic {
                    line: lines_read,
                    reason,
                };
                warn!("Skipping invalid {}", diagnostic);
                diagnostics.push(diagnostic);
            }
        }
    }

    pb.set_position(bytes_read);
    pb.finish_with_message("Records read");

    info!(
        "Loaded {} valid points from {} lines ({} skipped)",
        points.len(),
        lines_read,
        diagnostics.len()
    );

    Ok(Ingested {
        points: PointSet::new(points),
        diagnostics,
        lines_read,
        records_sampled,
    })
}

/// Parse one non-blank line into a point; extra trailing fields are ignored.
pub fn parse_record(line: &str) -> std::result::Result<SourcePoint, DiagnosticReason> {
    let tokens: Vec<&str> = line.split_whitespace().take(3).collect();
    if tokens.len() < 3 {
        return Err(DiagnosticReason::TooFewFields {
            found: tokens.len(),
        });
    }

    let mut coords = [0.0f64; 3];
    for ((slot, token), axis) in coords.iter_mut().zip(&tokens).zip(Axis::ALL) {
        let value: f64 = token
            .parse()
            .map_err(|_| DiagnosticReason::InvalidNumber {
                axis,
                token: token.to_string(),
            })?;
        if !value.is_finite() {
            return Err(DiagnosticReason::NonFinite { axis });
        }
        *slot = value;
    }

    Ok(SourcePoint::new(coords[0], coords[1], coords[2]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn read(text: &str, stride: usize) -> Ingested {
        ingest(Cursor::new(text.as_bytes()), stride).unwrap()
    }

    #[test]
    fn parses_valid_records_in_file_order() {
        let ingested = read("0 0 10\n10 0 12\n0 10 11\n10 10 13\n", 1);
        assert_eq!(ingested.points.len(), 4);
        assert_eq!(ingested.points.as_slice()[1], SourcePoint::new(10.0, 0.0, 12.0));
        assert!(ingested.diagnostics.is_empty());
    }

    #[test]
    fn empty_input_has_no_points_and_no_diagnostics() {
        let ingested = read("", 1);
        assert!(ingested.points.is_empty());
        assert!(ingested.diagnostics.is_empty());
        assert_eq!(ingested.lines_read, 0);
    }

    #[test]
    fn malformed_line_is_reported_and_skipped() {
        let ingested = read("1 2 3\nabc def ghi\n4 5 6\n", 1);
        assert_eq!(ingested.points.len(), 2);
        assert_eq!(ingested.diagnostics.len(), 1);
        assert_eq!(ingested.diagnostics[0].line, 2);
        assert_eq!(
            ingested.diagnostics[0].reason,
            DiagnosticReason::InvalidNumber {
                axis: Axis::X,
                token: "abc".to_string()
            }
        );
    }

    #[test]
    fn short_and_non_finite_lines_are_diagnosed() {
        let ingested = read("1 2\n1 2 inf\n1 NaN 2\n", 1);
        assert!(ingested.points.is_empty());
        let reasons: Vec<_> = ingested.diagnostics.iter().map(|d| d.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                DiagnosticReason::TooFewFields { found: 2 },
                DiagnosticReason::NonFinite { axis: Axis::Z },
                DiagnosticReason::NonFinite { axis: Axis::Y },
            ]
        );
    }

    #[test]
    fn trailing_fields_and_mixed_whitespace_are_accepted() {
        let ingested = read("  +1.5\t-2   3e2  extra 99\r\n", 1);
        assert_eq!(ingested.points.as_slice(), &[SourcePoint::new(1.5, -2.0, 300.0)]);
    }

    #[test]
    fn stride_counts_only_non_blank_lines() {
        let text = "0 0 0\n\n1 0 0\n   \n2 0 0\n3 0 0\n# note\n4 0 0\n";
        let ingested = read(text, 2);
        let xs: Vec<f64> = ingested.points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.0, 2.0, 4.0]);
        assert_eq!(ingested.records_sampled, 3);
    }

    #[test]
    fn skipped_lines_do_not_produce_diagnostics() {
        let ingested = read("0 0 0\nbad\n1 1 1\n", 2);
        assert_eq!(ingested.points.len(), 2);
        assert!(ingested.diagnostics.is_empty());
    }

    #[test]
    fn invalid_utf8_is_a_diagnostic() {
        let mut bytes = b"1 1 1\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        bytes.extend_from_slice(b"2 2 2\n");
        let ingested = ingest(Cursor::new(bytes), 1).unwrap();
        assert_eq!(ingested.points.len(), 2);
        assert_eq!(ingested.diagnostics[0].reason, DiagnosticReason::InvalidUtf8);
    }

    #[test]
    fn zero_stride_is_rejected() {
        let err = ingest(Cursor::new("1 1 1\n".as_bytes()), 0).unwrap_err();
        assert!(matches!(err, TerrainError::InvalidConfiguration(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = open_reader(Path::new("/definitely/not/here.xyz")).unwrap_err();
        assert!(matches!(err, TerrainError::Io { .. }));
    }
}
