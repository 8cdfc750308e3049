//! Display step: turn a finished [`Stack`] into something a person can look at.

pub mod png;

use std::path::PathBuf;

use crate::data::model::Stack;
use crate::error::Result;

/// What a render produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOutput {
    /// Written files, in frame order.
    pub files: Vec<PathBuf>,
    /// Sample values mapped to the two ends of the colormap.
    pub range: (f64, f64),
}

/// Consumes a complete stack.
///
/// `suspend`/`resume` bracket batch mode: while suspended a renderer defers
/// display. See [`crate::session::BatchScope`].
pub trait Renderer {
    fn render(&mut self, stack: &Stack) -> Result<RenderOutput>;

    fn suspend(&mut self) {}

    fn resume(&mut self) {}
}
