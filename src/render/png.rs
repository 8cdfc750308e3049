use std::path::PathBuf;

use image::{Rgb, RgbImage};
use log::{debug, info};

use super::{RenderOutput, Renderer};
use crate::color::{normalize, Colormap, DisplayRange, LUT_SIZE};
use crate::data::model::{Frame, Stack};
use crate::error::{Result, StackError};

// ---------------------------------------------------------------------------
// PNG renderer – one colour-mapped image per frame
// ---------------------------------------------------------------------------

/// Writes `<prefix><index>.png` for every frame, all frames sharing one
/// display range so intensities compare across the stack.
#[derive(Debug, Clone)]
pub struct PngRenderer {
    out_dir: PathBuf,
    prefix: String,
    range: DisplayRange,
    lut: Vec<[u8; 3]>,
    suspended: bool,
}

impl PngRenderer {
    pub fn new(out_dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        PngRenderer {
            out_dir: out_dir.into(),
            prefix: prefix.into(),
            range: DisplayRange::Auto,
            lut: Colormap::magma().lut(),
            suspended: false,
        }
    }

    pub fn with_range(mut self, range: DisplayRange) -> Self {
        self.range = range;
        self
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Colour-map one frame into an RGB image (width = cols, height = rows).
    pub fn frame_image(&self, frame: &Frame, range: (f64, f64)) -> RgbImage {
        RgbImage::from_fn(frame.cols() as u32, frame.rows() as u32, |x, y| {
            let value = frame.get(y as usize, x as usize).unwrap_or(f64::NAN);
            let t = if value.is_nan() { 0.0 } else { normalize(value, range) };
            let slot = (t * (LUT_SIZE - 1) as f64).round() as usize;
            Rgb(self.lut[slot.min(LUT_SIZE - 1)])
        })
    }
}

impl Renderer for PngRenderer {
    fn render(&mut self, stack: &Stack) -> Result<RenderOutput> {
        if self.suspended {
            return Err(StackError::Render("renderer is in batch mode".into()));
        }

        std::fs::create_dir_all(&self.out_dir)?;
        let range = self.range.resolve(stack);

        let mut files = Vec::with_capacity(stack.len());
        for (index, frame) in stack.iter().enumerate() {
            let path = self.out_dir.join(format!("{}{index}.png", self.prefix));
            self.frame_image(frame, range).save(&path)?;
            debug!("wrote {}", path.display());
            files.push(path);
        }

        info!(
            "rendered {} frames to {} (range {:.4}..{:.4})",
            files.len(),
            self.out_dir.display(),
            range.0,
            range.1
        );
        Ok(RenderOutput { files, range })
    }

    fn suspend(&mut self) {
        self.suspended = true;
    }

    fn resume(&mut self) {
        self.suspended = false;
    }
}
