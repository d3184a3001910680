use crate::cancel::{Destructor, NestedSlot};
use crate::coroutine::Point;

/// The heap resident state behind an active context.
///
/// One frame lives exactly as long as one run of the coroutine: it is
/// allocated on the first resume of an inactive context and released on
/// completion or cancellation.
pub(crate) struct Frame<L> {
    // where the next resume continues
    pub(crate) point: Point,
    // the persistent variables of the coroutine body
    pub(crate) locals: L,
    pub(crate) destructor: Option<Destructor<L>>,
    // the context of a coroutine driven from inside this one
    pub(crate) nested: NestedSlot,
}

impl<L: Default> Frame<L> {
    /// create the frame of a fresh run
    pub(crate) fn new() -> Box<Self> {
        Box::new(Frame {
            point: Point::ENTRY,
            locals: L::default(),
            destructor: None,
            nested: NestedSlot::empty(),
        })
    }
}

impl<L> Frame<L> {
    /// run the cleanup chain and free the frame
    ///
    /// the nested context goes first so that the innermost destructor
    /// always runs before the outer one
    pub(crate) fn release(mut self: Box<Self>) {
        self.nested.cancel();
        if let Some(dtor) = self.destructor.take() {
            trace!("run destructor at {}", self.point);
            dtor(&mut self.locals);
        }
    }
}
