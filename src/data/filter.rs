use std::collections::BTreeSet;
use std::path::Path;

use crate::error::{Result, StackError};

// ---------------------------------------------------------------------------
// Frame family: which files in a directory belong to one prefix
// ---------------------------------------------------------------------------

/// Indices of the `<prefix><n>.txt` files found in one directory, sorted
/// numerically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameFamily {
    indices: BTreeSet<usize>,
}

impl FrameFamily {
    /// Number of matching files.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Matching indices in ascending numeric order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// Smallest index in `0..len` that has no file, if any.
    pub fn first_gap(&self) -> Option<usize> {
        (0..self.len()).find(|i| !self.indices.contains(i))
    }

}

impl FromIterator<usize> for FrameFamily {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        FrameFamily {
            indices: iter.into_iter().collect(),
        }
    }
}

/// Parse the frame index out of `file_name` when it is `<prefix><digits>.txt`.
///
/// Only names the builder would open count: signs, whitespace, other
/// extensions and zero padding (`t_007.txt`) are rejected.
pub fn frame_index_of(file_name: &str, prefix: &str) -> Option<usize> {
    let digits = file_name.strip_prefix(prefix)?.strip_suffix(".txt")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }
    digits.parse().ok()
}

/// List `directory` and collect the frame family for `prefix`.
///
/// Directory listing order is irrelevant; sub-directories and non-UTF-8 names
/// are ignored.
pub fn scan_frame_family(directory: &Path, prefix: &str) -> Result<FrameFamily> {
    let dir_err = |source: std::io::Error| StackError::Directory {
        path: directory.to_path_buf(),
        source,
    };

    let mut family = BTreeSet::new();
    for entry in std::fs::read_dir(directory).map_err(dir_err)? {
        let entry = entry.map_err(dir_err)?;
        if entry.file_type().map(|t| t.is_dir()).unwrap_or(false) {
            continue;
        }
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        if let Some(index) = frame_index_of(name, prefix) {
            family.insert(index);
        }
    }
    Ok(FrameFamily { indices: family })
}
