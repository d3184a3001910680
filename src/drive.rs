//! Helpers for the caller side loop
//!
//! The crate never schedules a coroutine by itself, whoever owns the context
//! decides when to resume it. These helpers cover the common case of a plain
//! loop that resumes until the coroutine completes.

use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::context::Context;

/// The outcome of one invocation, as seen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step<T> {
    /// the coroutine suspended and is still active
    Yield(T),
    /// the coroutine completed, its context is inactive
    Return(T),
}

impl<T> Step<T> {
    /// return true if the coroutine suspended
    pub fn is_yield(&self) -> bool {
        matches!(self, Step::Yield(_))
    }

    /// return true if the coroutine completed
    pub fn is_return(&self) -> bool {
        matches!(self, Step::Return(_))
    }

    /// the suspended value, if the coroutine suspended
    pub fn as_yield(self) -> Option<T> {
        match self {
            Step::Yield(v) => Some(v),
            Step::Return(_) => None,
        }
    }

    /// the final value, if the coroutine completed
    pub fn as_return(self) -> Option<T> {
        match self {
            Step::Yield(_) => None,
            Step::Return(v) => Some(v),
        }
    }

    /// the value regardless of the outcome
    pub fn into_inner(self) -> T {
        match self {
            Step::Yield(v) | Step::Return(v) => v,
        }
    }
}

/// invoke the coroutine once and classify the outcome by the liveness of
/// the context afterwards
pub fn step<L, T, F>(ctx: &mut Context<L>, f: F) -> Step<T>
where
    F: FnOnce(&mut Context<L>) -> T,
{
    let value = f(ctx);
    if ctx.is_active() {
        Step::Yield(value)
    } else {
        Step::Return(value)
    }
}

/// An iterator resuming a coroutine until it completes.
///
/// Created by [`drive`]. The last item is always a [`Step::Return`].
pub struct Drive<'a, L, T, F> {
    ctx: &'a mut Context<L>,
    f: F,
    done: bool,
    _marker: PhantomData<fn() -> T>,
}

/// resume the coroutine `f` on `ctx` once per `next()`
///
/// an inactive context starts a new run, an active one continues the
/// suspended run. extra arguments of the coroutine are captured by `f`
/// and are handed over again on every resume
pub fn drive<L, T, F>(ctx: &mut Context<L>, f: F) -> Drive<'_, L, T, F>
where
    F: FnMut(&mut Context<L>) -> T,
{
    Drive {
        ctx,
        f,
        done: false,
        _marker: PhantomData,
    }
}

impl<'a, L, T, F> Iterator for Drive<'a, L, T, F>
where
    F: FnMut(&mut Context<L>) -> T,
{
    type Item = Step<T>;

    fn next(&mut self) -> Option<Step<T>> {
        if self.done {
            return None;
        }
        let s = step(self.ctx, &mut self.f);
        self.done = s.is_return();
        Some(s)
    }
}

impl<'a, L, T, F> FusedIterator for Drive<'a, L, T, F> where F: FnMut(&mut Context<L>) -> T {}

/// run the coroutine until it completes, collecting every value it
/// produced, the final one included
///
/// this never returns for a coroutine that never completes
pub fn run_to_completion<L, T, F>(ctx: &mut Context<L>, f: F) -> Vec<T>
where
    F: FnMut(&mut Context<L>) -> T,
{
    drive(ctx, f).map(Step::into_inner).collect()
}
