//! Run configuration.
//!
//! One [`RunConfig`] describes a complete run: which frame family to load,
//! how to parse it, and where the rendered stack goes. It can be written by
//! hand as JSON and loaded with [`RunConfig::load_json`]; command-line flags
//! are layered on top by the binary.
//!
//! ```json
//! {
//!   "source": { "directory": "data", "prefix": "t_", "frame_count": 50 },
//!   "loader": { "delimiter": "auto" },
//!   "render": { "out_dir": "data/render", "range": "auto" }
//! }
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::DisplayRange;
use crate::data::loader::Delimiter;
use crate::data::source::{FrameCount, SourceSet};

/// Complete configuration for one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    pub source: SourceConfig,
    pub loader: LoaderConfig,
    pub render: RenderConfig,
}

/// Which files to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub directory: PathBuf,
    pub prefix: String,
    /// `None` derives the count from the directory listing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frame_count: Option<usize>,
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig {
            directory: PathBuf::from("."),
            prefix: "t_".to_string(),
            frame_count: None,
        }
    }
}

/// How each frame file is parsed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    pub delimiter: Delimiter,
}

/// Where and how the stack is rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Output directory; `None` means `<source directory>/render`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub out_dir: Option<PathBuf>,
    pub range: DisplayRange,
}

impl RunConfig {
    /// Load configuration from a JSON file.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: RunConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON.
    pub fn save_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let text = serde_json::to_string_pretty(self).context("serializing config")?;
        fs::write(path, text).with_context(|| format!("writing config {}", path.display()))?;
        Ok(())
    }

    /// Reject values that can never produce a valid run.
    pub fn validate(&self) -> Result<()> {
        if self.source.prefix.is_empty() {
            bail!("source.prefix must not be empty");
        }
        if self.source.frame_count == Some(0) {
            bail!("source.frame_count must be positive");
        }
        if let DisplayRange::Fixed { min, max } = self.render.range {
            if !min.is_finite() || !max.is_finite() {
                bail!("render.range bounds must be finite (got {min}..{max})");
            }
            if min >= max {
                bail!("render.range min must be below max (got {min}..{max})");
            }
        }
        Ok(())
    }

    pub fn source_set(&self) -> SourceSet {
        let count = match self.source.frame_count {
            Some(n) => FrameCount::Explicit(n),
            None => FrameCount::FromDirectory,
        };
        SourceSet::new(&self.source.directory, &self.source.prefix, count)
    }

    pub fn out_dir(&self) -> PathBuf {
        self.render
            .out_dir
            .clone()
            .unwrap_or_else(|| self.source.directory.join("render"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RunConfig::default();
        assert_eq!(config.source.prefix, "t_");
        assert_eq!(config.loader.delimiter, Delimiter::Auto);
        assert_eq!(config.render.range, DisplayRange::Auto);
        assert_eq!(config.source_set().frame_count, FrameCount::FromDirectory);
        assert_eq!(config.out_dir(), PathBuf::from("./render"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_json() {
        let json = r#"{
            "source": { "directory": "data", "prefix": "px_", "frame_count": 50 },
            "render": { "range": { "fixed": { "min": 0.0, "max": 2.5 } } }
        }"#;
        let config: RunConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.source_set().frame_count, FrameCount::Explicit(50));
        assert_eq!(config.source_set().frame_path(3), PathBuf::from("data/px_3.txt"));
        assert_eq!(config.render.range, DisplayRange::Fixed { min: 0.0, max: 2.5 });
        assert_eq!(config.loader.delimiter, Delimiter::Auto);
    }

    #[test]
    fn test_delimiter_names() {
        let config: LoaderConfig = serde_json::from_str(r#"{ "delimiter": "comma" }"#).unwrap();
        assert_eq!(config.delimiter, Delimiter::Comma);
    }

    #[test]
    fn test_validate_rejects() {
        let mut config = RunConfig::default();
        config.source.prefix.clear();
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.source.frame_count = Some(0);
        assert!(config.validate().is_err());

        let mut config = RunConfig::default();
        config.render.range = DisplayRange::Fixed { min: 1.0, max: 1.0 };
        assert!(config.validate().is_err());

        config.render.range = DisplayRange::Fixed { min: 0.0, max: f64::INFINITY };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.json");

        let mut config = RunConfig::default();
        config.source.directory = PathBuf::from("frames");
        config.source.frame_count = Some(12);
        config.save_json(&path).unwrap();

        assert_eq!(RunConfig::load_json(&path).unwrap(), config);
    }
}
