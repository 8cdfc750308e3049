use std::path::PathBuf;

use anyhow::{Context, Result};
use log::info;

use crate::builder::StackBuilder;
use crate::config::RunConfig;
use crate::data::loader::TextMatrixLoader;
use crate::data::model::{Shape, Stack};
use crate::render::png::PngRenderer;
use crate::render::Renderer;
use crate::session::BatchScope;

// ---------------------------------------------------------------------------
// One run: build the stack in batch mode, then render it
// ---------------------------------------------------------------------------

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub frames: usize,
    pub shape: Shape,
    /// Stack-wide finite min/max, `None` when every sample is NaN.
    pub value_range: Option<(f64, f64)>,
    /// Values mapped to the ends of the colormap, `None` on a dry run.
    pub range: Option<(f64, f64)>,
    /// Rendered files, empty on a dry run.
    pub files: Vec<PathBuf>,
}

impl RunSummary {
    fn new(stack: &Stack, range: Option<(f64, f64)>, files: Vec<PathBuf>) -> Self {
        RunSummary {
            frames: stack.len(),
            shape: stack.shape(),
            value_range: stack.min_max(),
            range,
            files,
        }
    }
}

/// Wires builder and renderer together for one configuration.
pub struct StackApp<R = PngRenderer> {
    pub config: RunConfig,
    renderer: R,
}

impl StackApp<PngRenderer> {
    /// App with the PNG renderer configured from `config.render`.
    pub fn from_config(config: RunConfig) -> Self {
        let renderer = PngRenderer::new(config.out_dir(), config.source.prefix.clone())
            .with_range(config.render.range);
        StackApp { config, renderer }
    }
}

impl<R: Renderer> StackApp<R> {
    pub fn with_renderer(config: RunConfig, renderer: R) -> Self {
        StackApp { config, renderer }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Build the stack without touching the renderer.
    pub fn build(&self) -> Result<Stack> {
        Self::build_with(&self.config)
    }

    /// Build and render. Display stays suspended until the stack is complete
    /// and is released even when the build fails.
    pub fn run(&mut self) -> Result<RunSummary> {
        let scope = BatchScope::enter(&mut self.renderer);
        let stack = Self::build_with(&self.config)?;
        let output = scope.finish(&stack).context("rendering stack")?;

        let summary = RunSummary::new(&stack, Some(output.range), output.files);
        info!(
            "{} frames of {} rendered ({} files)",
            summary.frames,
            summary.shape,
            summary.files.len()
        );
        Ok(summary)
    }

    /// Build only; nothing is written.
    pub fn dry_run(&self) -> Result<RunSummary> {
        let stack = self.build()?;
        let summary = RunSummary::new(&stack, None, Vec::new());
        info!("dry run: {} frames of {}", summary.frames, summary.shape);
        Ok(summary)
    }

    fn build_with(config: &RunConfig) -> Result<Stack> {
        config.validate()?;
        let source = config.source_set();
        let builder = StackBuilder::new(TextMatrixLoader::new(config.loader.delimiter));
        builder.build(&source).with_context(|| {
            format!(
                "building '{}' stack from {}",
                source.prefix,
                source.directory.display()
            )
        })
    }
}
