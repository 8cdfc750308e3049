use std::io::ErrorKind;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use super::model::{Frame, Shape};
use crate::error::{Result, StackError};

// ---------------------------------------------------------------------------
// Loader seam
// ---------------------------------------------------------------------------

/// Turns one frame file into a [`Frame`].
///
/// `index` is only used for error reporting; implementations must not care
/// about the order in which they are called.
pub trait FrameLoader {
    fn load(&self, index: usize, path: &Path) -> Result<Frame>;
}

// ---------------------------------------------------------------------------
// Text matrix format
// ---------------------------------------------------------------------------

/// How values inside one row are separated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    /// Comma if the first data line has one, whitespace otherwise.
    #[default]
    Auto,
    /// Any run of spaces and tabs.
    Whitespace,
    Tab,
    Comma,
}

impl Delimiter {
    /// Resolve `Auto` against the file contents.
    fn resolve(self, text: &str) -> Delimiter {
        match self {
            Delimiter::Auto => {
                let first = text.lines().map(str::trim).find(|l| !is_skippable(l));
                match first {
                    Some(line) if line.contains(',') => Delimiter::Comma,
                    _ => Delimiter::Whitespace,
                }
            }
            other => other,
        }
    }
}

/// Where and why a text matrix failed to parse. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseIssue {
    pub line: usize,
    pub reason: String,
}

impl ParseIssue {
    fn new(line: usize, reason: impl Into<String>) -> Self {
        ParseIssue {
            line,
            reason: reason.into(),
        }
    }
}

fn is_skippable(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Parse one matrix from text.
///
/// Blank lines and `#` comment lines are skipped; every remaining row must
/// hold the same number of numeric values.
pub fn parse_text_matrix(text: &str, delimiter: Delimiter) -> std::result::Result<Frame, ParseIssue> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let rows = match delimiter.resolve(text) {
        Delimiter::Tab => read_delimited(text, b'\t')?,
        Delimiter::Comma => read_delimited(text, b',')?,
        _ => read_whitespace(text)?,
    };

    let mut grid = MatrixGrid::default();
    for (line, tokens) in rows {
        grid.push_row(line, &tokens)?;
    }
    grid.finish()
}

/// Rows as (line number, raw tokens), whitespace separated.
fn read_whitespace(text: &str) -> std::result::Result<Vec<(usize, Vec<String>)>, ParseIssue> {
    Ok(text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !is_skippable(l))
        .map(|(line, l)| (line, l.split_whitespace().map(str::to_string).collect()))
        .collect())
}

/// Rows as (line number, raw tokens), read through `csv` with one delimiter.
fn read_delimited(text: &str, delimiter: u8) -> std::result::Result<Vec<(usize, Vec<String>)>, ParseIssue> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line() as usize).unwrap_or(0);
            ParseIssue::new(line, e.to_string())
        })?;
        let line = record.position().map(|p| p.line() as usize).unwrap_or(0);

        if record.get(0).is_some_and(|first| first.starts_with('#')) {
            continue;
        }

        let mut tokens: Vec<String> = record.iter().map(str::to_string).collect();
        // "1,2,3," is a common export artifact
        while tokens.last().is_some_and(|t| t.is_empty()) {
            tokens.pop();
        }
        if tokens.is_empty() {
            continue;
        }
        rows.push((line, tokens));
    }
    Ok(rows)
}

#[derive(Default)]
struct MatrixGrid {
    cols: Option<usize>,
    rows: usize,
    values: Vec<f64>,
}

impl MatrixGrid {
    fn push_row(&mut self, line: usize, tokens: &[String]) -> std::result::Result<(), ParseIssue> {
        let expected = *self.cols.get_or_insert(tokens.len());
        if tokens.len() != expected {
            return Err(ParseIssue::new(
                line,
                format!("row has {} values, expected {expected}", tokens.len()),
            ));
        }
        for tok in tokens {
            let value = tok
                .parse::<f64>()
                .map_err(|_| ParseIssue::new(line, format!("'{tok}' is not a number")))?;
            self.values.push(value);
        }
        self.rows += 1;
        Ok(())
    }

    fn finish(self) -> std::result::Result<Frame, ParseIssue> {
        let cols = self.cols.unwrap_or(0);
        Frame::new(Shape::new(self.rows, cols), self.values)
            .ok_or_else(|| ParseIssue::new(0, "no numeric rows"))
    }
}

// ---------------------------------------------------------------------------
// File loader
// ---------------------------------------------------------------------------

/// Reads frames from plain-text numeric matrix files.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextMatrixLoader {
    pub delimiter: Delimiter,
}

impl TextMatrixLoader {
    pub fn new(delimiter: Delimiter) -> Self {
        TextMatrixLoader { delimiter }
    }
}

impl FrameLoader for TextMatrixLoader {
    fn load(&self, index: usize, path: &Path) -> Result<Frame> {
        let text = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::InvalidData => StackError::FrameParse {
                index,
                path: path.to_path_buf(),
                line: 0,
                reason: e.to_string(),
            },
            _ => {
                debug!("frame {index}: reading {} failed: {e}", path.display());
                StackError::FrameNotFound {
                    index,
                    path: path.to_path_buf(),
                }
            }
        })?;

        let frame = parse_text_matrix(&text, self.delimiter).map_err(|issue| StackError::FrameParse {
            index,
            path: path.to_path_buf(),
            line: issue.line,
            reason: issue.reason,
        })?;

        debug!("frame {index}: loaded {} ({})", path.display(), frame.shape());
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_whitespace_matrix() {
        let frame = parse_text_matrix("1 2\t3\n4   5 6\n", Delimiter::Auto).unwrap();
        assert_eq!(frame.shape(), Shape::new(2, 3));
        assert_eq!(frame.values(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_crlf_blank_and_comment_lines() {
        let text = "# exported frame\r\n1.5 -2e3\r\n\r\n   \r\nNaN inf\r\n";
        let frame = parse_text_matrix(text, Delimiter::Whitespace).unwrap();
        assert_eq!(frame.shape(), Shape::new(2, 2));
        assert_eq!(frame.get(0, 1), Some(-2000.0));
        assert!(frame.get(1, 0).unwrap().is_nan());
        assert_eq!(frame.get(1, 1), Some(f64::INFINITY));
    }

    #[test]
    fn test_auto_detects_comma() {
        let frame = parse_text_matrix("1, 2, 3,\n4, 5, 6,\n", Delimiter::Auto).unwrap();
        assert_eq!(frame.shape(), Shape::new(2, 3));
        assert_eq!(frame.row(1), &[4.0, 5.0, 6.0]);
    }

    #[test]
    fn test_tab_delimited() {
        let frame = parse_text_matrix("1\t2\n3\t4\n", Delimiter::Tab).unwrap();
        assert_eq!(frame.values(), &[1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_ragged_rows_report_line() {
        let issue = parse_text_matrix("1 2\n3\n", Delimiter::Whitespace).unwrap_err();
        assert_eq!(issue.line, 2);
        assert!(issue.reason.contains("expected 2"));
    }

    #[test]
    fn test_non_numeric_token() {
        let issue = parse_text_matrix("1 2\n3 x\n", Delimiter::Auto).unwrap_err();
        assert_eq!(issue.line, 2);
        assert!(issue.reason.contains("'x'"));

        let issue = parse_text_matrix("1,2\n3,abc\n", Delimiter::Comma).unwrap_err();
        assert_eq!(issue.line, 2);
    }

    #[test]
    fn test_leading_bom_is_ignored() {
        let frame = parse_text_matrix("\u{feff}1 2\n3 4\n", Delimiter::Auto).unwrap();
        assert_eq!(frame.values(), &[1.0, 2.0, 3.0, 4.0]);

        let frame = parse_text_matrix("\u{feff}1,2\n3,4\n", Delimiter::Auto).unwrap();
        assert_eq!(frame.shape(), Shape::new(2, 2));
    }

    #[test]
    fn test_indented_comments_in_delimited_mode() {
        let text = "  # header, exported\n1,2\n\t# more\n3,4\n";
        let frame = parse_text_matrix(text, Delimiter::Comma).unwrap();
        assert_eq!(frame.values(), &[1.0, 2.0, 3.0, 4.0]);

        let frame = parse_text_matrix("# a\n1\t2\n   # b\n3\t4\n", Delimiter::Tab).unwrap();
        assert_eq!(frame.shape(), Shape::new(2, 2));
    }

    #[test]
    fn test_empty_text_is_an_error() {
        let issue = parse_text_matrix("\n# nothing\n", Delimiter::Auto).unwrap_err();
        assert_eq!(issue.reason, "no numeric rows");
    }

    #[test]
    fn test_loader_maps_errors() {
        let dir = tempfile::tempdir().unwrap();
        let loader = TextMatrixLoader::default();

        let missing = dir.path().join("t_0.txt");
        let err = loader.load(0, &missing).unwrap_err();
        assert!(matches!(err, StackError::FrameNotFound { index: 0, .. }));

        let bad = dir.path().join("t_1.txt");
        std::fs::write(&bad, "1 2\nfoo 4\n").unwrap();
        let err = loader.load(1, &bad).unwrap_err();
        assert!(matches!(err, StackError::FrameParse { index: 1, line: 2, .. }));
    }

    #[test]
    fn test_invalid_utf8_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t_1.txt");
        std::fs::write(&path, b"1 2\n3 \xff\n").unwrap();

        let err = TextMatrixLoader::default().load(1, &path).unwrap_err();
        match err {
            StackError::FrameParse { index, path: p, line, .. } => {
                assert_eq!(index, 1);
                assert_eq!(p, path);
                assert_eq!(line, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
