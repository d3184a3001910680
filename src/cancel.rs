use std::any::{self, Any};

use crate::context::Context;

/// Cleanup callback of a coroutine.
///
/// It gets exclusive access to the coroutine locals and runs exactly once,
/// when the context is released, after any nested context was released.
/// It must not resume or dispose the context it belongs to.
pub type Destructor<L> = Box<dyn FnOnce(&mut L) + Send>;

// the nested context is owned by the frame without knowing its locals type
// this is all the frame needs from it
pub(crate) trait Cancel: Send {
    // dispose the context, no-op when already inactive
    fn cancel(&mut self);
    fn is_active(&self) -> bool;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn locals_name(&self) -> &'static str;
}

impl<L: Send + 'static> Cancel for Context<L> {
    fn cancel(&mut self) {
        self.dispose();
    }

    fn is_active(&self) -> bool {
        Context::is_active(self)
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn locals_name(&self) -> &'static str {
        any::type_name::<L>()
    }
}

/// The single nested context slot of a frame
pub(crate) struct NestedSlot {
    inner: Option<Box<dyn Cancel>>,
}

impl NestedSlot {
    pub(crate) fn empty() -> Self {
        NestedSlot { inner: None }
    }

    pub(crate) fn is_active(&self) -> bool {
        self.inner.as_ref().is_some_and(|ctx| ctx.is_active())
    }

    /// get the nested context for coroutines with locals `M`
    ///
    /// a slot that still holds a context of another locals type is
    /// disposed first and replaced by a fresh one
    pub(crate) fn context<M: Send + 'static>(&mut self) -> &mut Context<M> {
        let reuse = match self.inner.as_mut() {
            Some(ctx) => ctx.as_any_mut().is::<Context<M>>(),
            None => true,
        };

        if !reuse {
            if let Some(mut old) = self.inner.take() {
                if old.is_active() {
                    warn!(
                        "nested context of {} cancelled to make room for {}",
                        old.locals_name(),
                        any::type_name::<M>()
                    );
                }
                old.cancel();
            }
        }

        let slot = self
            .inner
            .get_or_insert_with(|| Box::new(Context::<M>::new()));
        match slot.as_any_mut().downcast_mut::<Context<M>>() {
            Some(ctx) => ctx,
            None => unreachable!("nested slot holds a foreign context"),
        }
    }

    /// dispose the nested context, if any
    pub(crate) fn cancel(&mut self) {
        if let Some(mut ctx) = self.inner.take() {
            ctx.cancel();
        }
    }
}
