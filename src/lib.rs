//! Assemble numbered text-matrix files (`t_0.txt`, `t_1.txt`, …) into one
//! ordered frame stack and render it through a magma colormap.
//!
//! ```text
//!  SourceSet ──► builder ──► Stack ──► render (magma PNGs)
//!                  │
//!           data::{filter, source, loader}
//! ```
//!
//! ```no_run
//! use rusty_stack::builder::StackBuilder;
//! use rusty_stack::data::loader::TextMatrixLoader;
//! use rusty_stack::data::source::{FrameCount, SourceSet};
//!
//! let source = SourceSet::new("data", "t_", FrameCount::FromDirectory);
//! let stack = StackBuilder::new(TextMatrixLoader::default()).build(&source)?;
//! println!("{} frames of {}", stack.len(), stack.shape());
//! # Ok::<(), rusty_stack::error::StackError>(())
//! ```

pub mod app;
pub mod builder;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod render;
pub mod session;
