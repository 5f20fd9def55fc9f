use crate::core::models::structure::AlignmentTriple;
use nalgebra::Matrix4;
use thiserror::Error;

/// Case-insensitive substring marking the start of the rotation-matrix
/// block (stdout or the appended auxiliary matrix file).
const MATRIX_HEADER_MARKER: &str = "rotation matrix";
/// Literal prefix of the legend line that precedes the three-line
/// alignment block.
const ALIGNMENT_MARKER: &str = "(\":\"";
/// Labels for the two numeric summary values. Each is matched as
/// `<label> = <float>` with optional whitespace around the `=`.
const SCORE_LABEL: &str = "TM-score";
const RMSD_LABEL: &str = "RMSD";

#[derive(Debug, Error, PartialEq)]
pub enum ParseError {
    #[error("Non-numeric token '{token}' in matrix row {row}")]
    NonNumericToken { row: usize, token: String },
    #[error("Matrix row {row} has {found} tokens, expected at least 5")]
    ShortMatrixRow { row: usize, found: usize },
    #[error("Matrix block ended after {rows} of 3 data rows")]
    IncompleteMatrix { rows: usize },
    #[error("Alignment block truncated: {found} of 3 lines present")]
    TruncatedAlignmentBlock { found: usize },
}

/// The payload extracted from one tool invocation. Any field may be absent;
/// absence of the score is for the caller to judge, not a parse failure.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ParsedAlignment {
    pub tm_score: Option<f64>,
    pub rmsd: Option<f64>,
    pub transform: Option<Matrix4<f64>>,
    pub alignment: Option<AlignmentTriple>,
}

impl ParsedAlignment {
    /// Reports values the tool printed outside their documented ranges: a
    /// negative RMSD, a similarity score outside [0, 1], or alignment-block
    /// lines of unequal length. Out-of-range values are kept as parsed;
    /// the caller decides whether to log or reject them.
    pub fn range_violations(&self) -> Vec<String> {
        let mut found = Vec::new();
        if let Some(score) = self.tm_score
            && !(0.0..=1.0).contains(&score)
        {
            found.push(format!("similarity score {score} outside [0, 1]"));
        }
        if let Some(rmsd) = self.rmsd
            && rmsd < 0.0
        {
            found.push(format!("negative RMSD {rmsd}"));
        }
        if let Some(triple) = &self.alignment
            && (triple.mobile.len() != triple.markers.len()
                || triple.mobile.len() != triple.target.len())
        {
            found.push("alignment block lines have unequal lengths".to_string());
        }
        found
    }
}

/// How a line read in the seeking state is handled.
enum LineKind {
    MatrixHeader,
    AlignmentMarker,
    Score(f64),
    Rmsd(f64),
    Other,
}

fn classify(line: &str) -> LineKind {
    if line.to_ascii_lowercase().contains(MATRIX_HEADER_MARKER) {
        return LineKind::MatrixHeader;
    }
    if line.trim_start().starts_with(ALIGNMENT_MARKER) {
        return LineKind::AlignmentMarker;
    }
    if let Some(value) = labeled_float(line, SCORE_LABEL) {
        return LineKind::Score(value);
    }
    if let Some(value) = labeled_float(line, RMSD_LABEL) {
        return LineKind::Rmsd(value);
    }
    LineKind::Other
}

/// Matches `<label><ws>=<ws><float>` anywhere in the line and returns the
/// float. The first occurrence in the line wins.
fn labeled_float(line: &str, label: &str) -> Option<f64> {
    let at = line.find(label)?;
    let rest = line[at + label.len()..].trim_start();
    let rest = rest.strip_prefix('=')?.trim_start();
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E')))
        .unwrap_or(rest.len());
    rest[..end].parse().ok()
}

/// Rotation and translation entries accumulated from the matrix block.
#[derive(Default)]
struct MatrixAccumulator {
    rotation: Vec<f64>,    // 9 entries, row-major
    translation: Vec<f64>, // 3 entries
}

impl MatrixAccumulator {
    /// Consumes one matrix data row: `<index> <t> <r0> <r1> <r2>`.
    /// The leading row index is ignored.
    fn push_row(&mut self, line: &str, row: usize) -> Result<(), ParseError> {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 5 {
            return Err(ParseError::ShortMatrixRow {
                row,
                found: tokens.len(),
            });
        }
        let numeric = |token: &str| -> Result<f64, ParseError> {
            token.parse().map_err(|_| ParseError::NonNumericToken {
                row,
                token: token.to_string(),
            })
        };
        let t = numeric(tokens[1])?;
        for token in &tokens[2..5] {
            let r = numeric(token)?;
            self.rotation.push(r);
        }
        self.translation.push(t);
        Ok(())
    }

    fn rows_consumed(&self) -> usize {
        self.translation.len()
    }

    /// Builds the homogeneous transform once all 12 numeric entries are in.
    /// The fourth row [0,0,0,1] is appended here and never read from input.
    fn into_transform(self) -> Matrix4<f64> {
        let r = &self.rotation;
        let t = &self.translation;
        Matrix4::new(
            r[0], r[1], r[2], t[0], //
            r[3], r[4], r[5], t[1], //
            r[6], r[7], r[8], t[2], //
            0.0, 0.0, 0.0, 1.0,
        )
    }
}

enum ParserState {
    Seeking,
    InMatrix { row: usize },
}

/// Parses the tool's combined textual output (stdout with the auxiliary
/// matrix file appended). Pure and deterministic: identical text always
/// yields identical results.
pub fn parse_output(text: &str) -> Result<ParsedAlignment, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    let mut parsed = ParsedAlignment::default();
    let mut state = ParserState::Seeking;
    let mut matrix = MatrixAccumulator::default();

    let mut i = 0;
    while i < lines.len() {
        let line = lines[i];
        match state {
            ParserState::InMatrix { row } => {
                let row = row + 1;
                matrix.push_row(line, row)?;
                if row == 4 {
                    // 12 numeric entries are in; the counter would exceed 4
                    // on the next line, so return to seeking.
                    parsed.transform = Some(std::mem::take(&mut matrix).into_transform());
                    state = ParserState::Seeking;
                } else {
                    state = ParserState::InMatrix { row };
                }
                i += 1;
                continue;
            }
            ParserState::Seeking => {}
        }

        match classify(line) {
            LineKind::MatrixHeader => {
                state = ParserState::InMatrix { row: 1 };
                matrix = MatrixAccumulator::default();
            }
            LineKind::AlignmentMarker => {
                let block = &lines[i + 1..];
                if block.len() < 3 {
                    return Err(ParseError::TruncatedAlignmentBlock { found: block.len() });
                }
                parsed.alignment = Some(AlignmentTriple {
                    mobile: block[0].to_string(),
                    markers: block[1].to_string(),
                    target: block[2].to_string(),
                });
                i += 3;
            }
            LineKind::Score(value) => {
                if parsed.tm_score.is_none() {
                    parsed.tm_score = Some(value);
                }
            }
            LineKind::Rmsd(value) => {
                if parsed.rmsd.is_none() {
                    parsed.rmsd = Some(value);
                }
            }
            LineKind::Other => {}
        }
        i += 1;
    }

    if let ParserState::InMatrix { .. } = state {
        if matrix.rows_consumed() < 3 {
            return Err(ParseError::IncompleteMatrix {
                rows: matrix.rows_consumed(),
            });
        }
    }

    Ok(parsed)
}
