use log::{debug, info};

use crate::data::loader::{FrameLoader, TextMatrixLoader};
use crate::data::model::{Frame, Stack};
use crate::data::source::SourceSet;
use crate::error::{Result, StackError};

// ---------------------------------------------------------------------------
// Assembler seam: ordered frames → stack
// ---------------------------------------------------------------------------

/// Collects frames handed over in ascending index order into a [`Stack`].
pub trait StackAssembler {
    /// Accept frame `index`. Frame 0 starts the stack, later frames append.
    fn push(&mut self, index: usize, frame: Frame) -> Result<()>;

    /// Hand over the finished stack, or `None` if nothing was pushed.
    fn finish(self) -> Option<Stack>;
}

/// Pure append assembler. Order comes from the caller; the assembler only
/// enforces that every frame matches the shape of the first one.
#[derive(Debug, Default)]
pub struct SequentialAssembler {
    stack: Option<Stack>,
}

impl SequentialAssembler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StackAssembler for SequentialAssembler {
    fn push(&mut self, index: usize, frame: Frame) -> Result<()> {
        if let Some(stack) = self.stack.as_mut() {
            return stack.push(frame).map_err(|rejected| StackError::FrameShapeMismatch {
                index,
                expected: stack.shape(),
                found: rejected.shape(),
            });
        }
        self.stack = Some(Stack::new(frame));
        Ok(())
    }

    fn finish(self) -> Option<Stack> {
        self.stack
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Loads `<prefix>0.txt … <prefix>{n-1}.txt` in ascending order into one stack.
///
/// The first failing frame aborts the whole build; no partial stack is ever
/// returned.
#[derive(Debug, Clone, Default)]
pub struct StackBuilder<L = TextMatrixLoader> {
    loader: L,
}

impl<L: FrameLoader> StackBuilder<L> {
    pub fn new(loader: L) -> Self {
        StackBuilder { loader }
    }

    /// Build a stack from `source`, resolving the frame count first.
    pub fn build(&self, source: &SourceSet) -> Result<Stack> {
        let count = source.resolve_count()?;
        self.build_frames(source, count, SequentialAssembler::new())
    }

    /// Build exactly `count` frames into `assembler`, skipping the
    /// directory scan.
    pub fn build_frames<A: StackAssembler>(
        &self,
        source: &SourceSet,
        count: usize,
        mut assembler: A,
    ) -> Result<Stack> {
        source.validate()?;
        if count == 0 {
            return Err(StackError::InvalidSource("frame count must be positive".into()));
        }

        for index in 0..count {
            let path = source.frame_path(index);
            let frame = self.loader.load(index, &path)?;
            assembler.push(index, frame)?;
            debug!("frame {index}/{count} appended");
        }

        let stack = assembler
            .finish()
            .ok_or_else(|| StackError::InvalidSource("assembler produced no stack".into()))?;
        info!(
            "assembled {} frames of {} from {}",
            stack.len(),
            stack.shape(),
            source.directory.display()
        );
        Ok(stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::source::FrameCount;
    use crate::data::model::Shape;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::path::{Path, PathBuf};
    use std::rc::Rc;

    /// In-memory loader that records the order it was asked for frames.
    #[derive(Default)]
    struct MemoryLoader {
        frames: HashMap<PathBuf, Frame>,
        calls: Rc<RefCell<Vec<usize>>>,
    }

    impl MemoryLoader {
        fn with(mut self, path: &str, rows: &[&[f64]]) -> Self {
            self.frames.insert(PathBuf::from(path), Frame::from_rows(rows).unwrap());
            self
        }
    }

    impl FrameLoader for MemoryLoader {
        fn load(&self, index: usize, path: &Path) -> Result<Frame> {
            self.calls.borrow_mut().push(index);
            self.frames.get(path).cloned().ok_or_else(|| StackError::FrameNotFound {
                index,
                path: path.to_path_buf(),
            })
        }
    }

    fn source() -> SourceSet {
        SourceSet::new("mem", "t_", FrameCount::Explicit(3))
    }

    #[test]
    fn test_loads_in_ascending_order() {
        let loader = MemoryLoader::default()
            .with("mem/t_2.txt", &[&[3.0]])
            .with("mem/t_0.txt", &[&[1.0]])
            .with("mem/t_1.txt", &[&[2.0]]);
        let calls = Rc::clone(&loader.calls);
        let builder = StackBuilder::new(loader);

        let stack = builder.build_frames(&source(), 3, SequentialAssembler::new()).unwrap();

        assert_eq!(*calls.borrow(), vec![0, 1, 2]);
        let firsts: Vec<f64> = stack.iter().map(|f| f.values()[0]).collect();
        assert_eq!(firsts, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_missing_frame_stops_the_build() {
        let loader = MemoryLoader::default()
            .with("mem/t_0.txt", &[&[1.0]])
            .with("mem/t_2.txt", &[&[3.0]]);
        let calls = Rc::clone(&loader.calls);
        let builder = StackBuilder::new(loader);

        let err = builder.build_frames(&source(), 3, SequentialAssembler::new()).unwrap_err();

        assert!(matches!(err, StackError::FrameNotFound { index: 1, .. }));
        assert_eq!(*calls.borrow(), vec![0, 1]);
    }

    #[test]
    fn test_shape_mismatch_names_frame() {
        let loader = MemoryLoader::default()
            .with("mem/t_0.txt", &[&[1.0, 2.0], &[3.0, 4.0]])
            .with("mem/t_1.txt", &[&[5.0, 6.0], &[7.0, 8.0]])
            .with("mem/t_2.txt", &[&[1.0, 2.0, 3.0]]);
        let builder = StackBuilder::new(loader);

        let err = builder.build_frames(&source(), 3, SequentialAssembler::new()).unwrap_err();

        match err {
            StackError::FrameShapeMismatch { index, expected, found } => {
                assert_eq!(index, 2);
                assert_eq!(expected, Shape::new(2, 2));
                assert_eq!(found, Shape::new(1, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_count_rejected() {
        let builder = StackBuilder::new(MemoryLoader::default());
        let err = builder.build_frames(&source(), 0, SequentialAssembler::new()).unwrap_err();
        assert!(matches!(err, StackError::InvalidSource(_)));
    }

    #[test]
    fn test_assembler_first_frame_sets_shape() {
        assert!(SequentialAssembler::new().finish().is_none());

        let mut asm = SequentialAssembler::new();
        asm.push(0, Frame::from_rows(&[[1.0, 2.0]]).unwrap()).unwrap();
        asm.push(1, Frame::from_rows(&[[3.0, 4.0]]).unwrap()).unwrap();
        let stack = asm.finish().unwrap();
        assert_eq!(stack.len(), 2);
        assert_eq!(stack.shape(), Shape::new(1, 2));
    }
}
