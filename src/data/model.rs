use std::fmt;

// ---------------------------------------------------------------------------
// Shape – rows × columns of one frame
// ---------------------------------------------------------------------------

/// Dimensions of a frame. Every frame of a stack shares one shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Shape {
    pub fn new(rows: usize, cols: usize) -> Self {
        Shape { rows, cols }
    }

    /// Number of samples in a frame of this shape.
    pub fn len(&self) -> usize {
        self.rows * self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}×{}", self.rows, self.cols)
    }
}

// ---------------------------------------------------------------------------
// Frame – one numeric matrix loaded from one text file
// ---------------------------------------------------------------------------

/// A 2-D matrix of samples, stored row-major. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    shape: Shape,
    values: Vec<f64>,
}

impl Frame {
    /// Build a frame from row-major samples.
    ///
    /// Returns `None` when the shape is empty or does not match `values.len()`.
    pub fn new(shape: Shape, values: Vec<f64>) -> Option<Self> {
        if shape.is_empty() || shape.len() != values.len() {
            return None;
        }
        Some(Frame { shape, values })
    }

    /// Build a frame from a slice of equally long rows.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Option<Self> {
        let cols = rows.first()?.as_ref().len();
        if rows.iter().any(|r| r.as_ref().len() != cols) {
            return None;
        }
        let values = rows.iter().flat_map(|r| r.as_ref().iter().copied()).collect();
        Frame::new(Shape::new(rows.len(), cols), values)
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> usize {
        self.shape.rows
    }

    pub fn cols(&self) -> usize {
        self.shape.cols
    }

    /// Sample at (`row`, `col`), or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.shape.rows || col >= self.shape.cols {
            return None;
        }
        Some(self.values[row * self.shape.cols + col])
    }

    /// One row of samples. Panics when `row` is out of bounds.
    pub fn row(&self, row: usize) -> &[f64] {
        let start = row * self.shape.cols;
        &self.values[start..start + self.shape.cols]
    }

    /// All samples, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Smallest and largest finite sample, ignoring NaN and infinities.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        finite_min_max(self.values.iter().copied())
    }
}

pub(crate) fn finite_min_max(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

// ---------------------------------------------------------------------------
// Stack – the ordered frame sequence
// ---------------------------------------------------------------------------

/// Frames in strictly ascending index order, all of one shape.
///
/// A stack always holds at least one frame: it is created from frame 0 and
/// only the assembler can append to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack {
    shape: Shape,
    frames: Vec<Frame>,
}

impl Stack {
    /// Start a stack from its first frame.
    pub fn new(first: Frame) -> Self {
        Stack {
            shape: first.shape(),
            frames: vec![first],
        }
    }

    /// Append a frame to the end. Hands the frame back when its shape differs.
    pub(crate) fn push(&mut self, frame: Frame) -> Result<(), Frame> {
        if frame.shape() != self.shape {
            return Err(frame);
        }
        self.frames.push(frame);
        Ok(())
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Frame> {
        self.frames.iter()
    }

    /// Stack-wide finite min/max across every frame.
    pub fn min_max(&self) -> Option<(f64, f64)> {
        finite_min_max(self.frames.iter().flat_map(|f| f.values().iter().copied()))
    }

    pub fn into_frames(self) -> Vec<Frame> {
        self.frames
    }
}

impl<'a> IntoIterator for &'a Stack {
    type Item = &'a Frame;
    type IntoIter = std::slice::Iter<'a, Frame>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames.iter()
    }
}
