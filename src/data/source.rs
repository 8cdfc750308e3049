use std::path::PathBuf;

use log::warn;
use serde::{Deserialize, Serialize};

use super::filter::scan_frame_family;
use crate::error::{Result, StackError};

/// How many frames to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrameCount {
    /// Exactly this many frames, `0..n`.
    Explicit(usize),
    /// As many as there are `<prefix><n>.txt` files in the directory.
    FromDirectory,
}

/// Which files make up one stack: `<directory>/<prefix><i>.txt` for
/// `i in 0..count`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceSet {
    pub directory: PathBuf,
    pub prefix: String,
    pub frame_count: FrameCount,
}

impl SourceSet {
    pub fn new(directory: impl Into<PathBuf>, prefix: impl Into<String>, frame_count: FrameCount) -> Self {
        SourceSet {
            directory: directory.into(),
            prefix: prefix.into(),
            frame_count,
        }
    }

    /// Path of the file holding frame `index`.
    pub fn frame_path(&self, index: usize) -> PathBuf {
        self.directory.join(frame_file_name(&self.prefix, index))
    }

    /// Check the parameters that do not need the file system.
    pub fn validate(&self) -> Result<()> {
        if self.prefix.is_empty() {
            return Err(StackError::InvalidSource("prefix must not be empty".into()));
        }
        if self.frame_count == FrameCount::Explicit(0) {
            return Err(StackError::InvalidSource("frame count must be positive".into()));
        }
        Ok(())
    }

    /// Number of frames the build will load.
    ///
    /// An explicit count larger than the files actually present is allowed
    /// but logged: the build then fails at the first missing index.
    pub fn resolve_count(&self) -> Result<usize> {
        self.validate()?;
        let family = scan_frame_family(&self.directory, &self.prefix)?;

        match self.frame_count {
            FrameCount::FromDirectory => {
                if family.is_empty() {
                    return Err(StackError::EmptySource {
                        directory: self.directory.clone(),
                        prefix: self.prefix.clone(),
                    });
                }
                if let Some(gap) = family.first_gap() {
                    warn!(
                        "{}: {} '{}' files but index {gap} is missing",
                        self.directory.display(),
                        family.len(),
                        self.prefix
                    );
                }
                Ok(family.len())
            }
            FrameCount::Explicit(n) => {
                if n > family.len() {
                    warn!(
                        "{}: {n} frames requested but only {} '{}' files present",
                        self.directory.display(),
                        family.len(),
                        self.prefix
                    );
                }
                Ok(n)
            }
        }
    }
}

/// `<prefix><index>.txt`
pub fn frame_file_name(prefix: &str, index: usize) -> String {
    format!("{prefix}{index}.txt")
}
