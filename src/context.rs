use std::fmt;

use crate::coroutine::Point;
use crate::local::Frame;

/// The persistent state of a coroutine between invocations.
///
/// A context is either *inactive*, with no backing allocation, or
/// *active*, owning the coroutine locals, the point where the next
/// resume continues, an optional destructor and one nested context.
///
/// A fresh context is inactive. The first resume allocates it, a
/// completion or a [`dispose`](Context::dispose) releases it again, after
/// which it is indistinguishable from a fresh one and the next resume
/// starts the coroutine over from its entry.
///
/// Dropping an active context disposes it, so destructors run even when
/// the owner goes out of scope mid-run.
pub struct Context<L> {
    frame: Option<Box<Frame<L>>>,
}

impl<L> Context<L> {
    /// create an inactive context
    pub const fn new() -> Self {
        Context { frame: None }
    }

    /// return true if the coroutine is suspended, i.e. it has been
    /// started and has neither completed nor been disposed
    #[inline]
    pub fn is_active(&self) -> bool {
        self.frame.is_some()
    }

    /// the point where the next resume continues, `None` when inactive
    pub fn point(&self) -> Option<Point> {
        self.frame.as_ref().map(|f| f.point)
    }

    /// release the context, cancelling the coroutine if it's suspended
    ///
    /// the nested context is disposed first, then the registered
    /// destructor runs with the locals, then the allocation is freed.
    /// disposing an inactive context does nothing, so this can be called
    /// any number of times
    pub fn dispose(&mut self) {
        if let Some(frame) = self.frame.take() {
            trace!(
                "dispose context at {}, nested active: {}",
                frame.point,
                frame.nested.is_active()
            );
            frame.release();
        }
    }

    pub(crate) fn frame(&self) -> Option<&Frame<L>> {
        self.frame.as_deref()
    }

    pub(crate) fn frame_mut(&mut self) -> Option<&mut Frame<L>> {
        self.frame.as_deref_mut()
    }
}

impl<L: Default> Context<L> {
    // allocate the frame if needed, return true if it was allocated now
    pub(crate) fn activate(&mut self) -> bool {
        if self.frame.is_some() {
            return false;
        }
        trace!("allocate context for {}", std::any::type_name::<L>());
        self.frame = Some(Frame::new());
        true
    }
}

impl<L> Default for Context<L> {
    fn default() -> Self {
        Context::new()
    }
}

impl<L> Drop for Context<L> {
    fn drop(&mut self) {
        self.dispose();
    }
}

impl<L> fmt::Debug for Context<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Context")
            .field("active", &self.is_active())
            .field("point", &self.point())
            .finish()
    }
}
