use log::debug;

use crate::data::model::Stack;
use crate::error::Result;
use crate::render::{RenderOutput, Renderer};

// ---------------------------------------------------------------------------
// Batch mode – display deferred until the whole stack exists
// ---------------------------------------------------------------------------

/// Holds a renderer in batch mode for as long as the scope lives.
///
/// Entering suspends the renderer. [`BatchScope::finish`] resumes it and
/// renders the stack; dropping the scope any other way (an early `?` return
/// from a failed build) resumes it without rendering. Either way the renderer
/// is resumed exactly once.
pub struct BatchScope<'r, R: Renderer + ?Sized> {
    renderer: &'r mut R,
    released: bool,
}

impl<'r, R: Renderer + ?Sized> BatchScope<'r, R> {
    pub fn enter(renderer: &'r mut R) -> Self {
        renderer.suspend();
        debug!("batch mode on");
        BatchScope {
            renderer,
            released: false,
        }
    }

    /// Leave batch mode and render `stack`.
    pub fn finish(mut self, stack: &Stack) -> Result<RenderOutput> {
        self.release();
        self.renderer.render(stack)
    }

    fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.renderer.resume();
            debug!("batch mode off");
        }
    }
}

impl<R: Renderer + ?Sized> Drop for BatchScope<'_, R> {
    fn drop(&mut self) {
        self.release();
    }
}
