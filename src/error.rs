use std::path::PathBuf;

use thiserror::Error;

use crate::data::model::Shape;

/// Everything that can stop a stack build or a render.
///
/// Frame-level variants carry the frame index and the file they came from so
/// the failure can be reported without any further lookup.
#[derive(Debug, Error)]
pub enum StackError {
    #[error("frame {index}: file {} not found or unreadable", .path.display())]
    FrameNotFound { index: usize, path: PathBuf },

    #[error("frame {index}: cannot parse {} (line {line}): {reason}", .path.display())]
    FrameParse {
        index: usize,
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("frame {index}: shape {found} does not match stack shape {expected}")]
    FrameShapeMismatch {
        index: usize,
        expected: Shape,
        found: Shape,
    },

    #[error("cannot read source directory {}: {source}", .path.display())]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no files matching '{prefix}<n>.txt' in {}", .directory.display())]
    EmptySource { directory: PathBuf, prefix: String },

    #[error("invalid source: {0}")]
    InvalidSource(String),

    #[error("render failed: {0}")]
    Render(String),

    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StackError {
    /// Index of the offending frame, for the three per-frame failures.
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            StackError::FrameNotFound { index, .. }
            | StackError::FrameParse { index, .. }
            | StackError::FrameShapeMismatch { index, .. } => Some(*index),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, StackError>;
