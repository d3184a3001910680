//! Resumable functions
//!
//! A coroutine is a plain function taking `&mut Context<L>` as its first
//! argument. Its body is written as a state machine: every place where the
//! function may be re-entered gets a distinct [`Point`], and each invocation
//! dispatches on the saved point inside a `loop { match .. }`, falling
//! through from one segment to the next with [`Activation::jump`] until it
//! either suspends or completes.
//!
//! ```
//! use coro_ctx::{resume_points, Context, Point};
//!
//! #[derive(Default)]
//! struct Counter {
//!     i: i32,
//! }
//!
//! resume_points!(CHECK, NEXT);
//!
//! // yields 0..10, then returns -1
//! fn counter(ctx: &mut Context<Counter>) -> i32 {
//!     let mut co = ctx.enter();
//!     loop {
//!         match co.point() {
//!             Point::ENTRY => {
//!                 co.i = 0;
//!                 co.jump(CHECK);
//!             }
//!             CHECK => {
//!                 if co.i >= 10 {
//!                     return co.complete(-1);
//!                 }
//!                 let i = co.i;
//!                 return co.suspend(NEXT, i);
//!             }
//!             NEXT => {
//!                 co.i += 1;
//!                 co.jump(CHECK);
//!             }
//!             _ => co.unknown_point(),
//!         }
//!     }
//! }
//!
//! let mut ctx = Context::new();
//! let mut seen = vec![];
//! loop {
//!     seen.push(counter(&mut ctx));
//!     if !ctx.is_active() {
//!         break;
//!     }
//! }
//! assert_eq!(seen, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, -1]);
//! ```
//!
//! Arguments other than the context are passed again on every invocation;
//! only what the body stores in its locals survives a suspension.

use std::fmt;
use std::ops::{Deref, DerefMut};

use crate::config::config;
use crate::context::Context;
use crate::error::{misuse, Misuse};
use crate::local::Frame;

/// A resumption point inside a coroutine body.
///
/// Points are only compared with each other, the number carries no
/// meaning besides being distinct per body. [`Point::ENTRY`] is where
/// every run starts, the others are usually declared with
/// [`resume_points!`](crate::resume_points).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point(u32);

impl Point {
    /// the point every fresh run starts at
    pub const ENTRY: Point = Point(0);

    /// create the point with the given ordinal
    pub const fn new(n: u32) -> Point {
        Point(n)
    }

    /// the ordinal of the point
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One invocation of a coroutine.
///
/// Obtained from [`Context::enter`], it gives the body access to its locals
/// (through `Deref`), to the saved point and to the nested context, and it
/// ends either with [`suspend`](Activation::suspend) or with
/// [`complete`](Activation::complete).
///
/// Dropping an activation without either leaves the context active at its
/// current point, the next invocation re-enters that same segment.
#[must_use = "a coroutine invocation should end with `suspend` or `complete`"]
pub struct Activation<'a, L> {
    ctx: &'a mut Context<L>,
    fresh: bool,
}

impl<L: Default> Context<L> {
    /// start one invocation of the coroutine owning this context
    ///
    /// an inactive context is allocated here, with default locals, no
    /// destructor, an empty nested context and the point set to
    /// [`Point::ENTRY`]
    pub fn enter(&mut self) -> Activation<'_, L> {
        let fresh = self.activate();
        Activation { ctx: self, fresh }
    }
}

/// start one invocation through an optional context reference
///
/// this is the entry for call sites that hold the context behind an
/// `Option` or a raw pointer. a missing context is a usage error that
/// never returns: the process is aborted, or a panic with
/// [`Misuse::MissingContext`] is raised when
/// [`Config::set_abort_on_misuse`](crate::Config::set_abort_on_misuse) is
/// turned off
pub fn enter<L: Default>(ctx: Option<&mut Context<L>>) -> Activation<'_, L> {
    match ctx {
        Some(ctx) => ctx.enter(),
        None => misuse(Misuse::MissingContext),
    }
}

impl<'a, L> Activation<'a, L> {
    #[inline]
    fn frame(&self) -> &Frame<L> {
        match self.ctx.frame() {
            Some(frame) => frame,
            None => unreachable!("activation of an inactive context"),
        }
    }

    #[inline]
    fn frame_mut(&mut self) -> &mut Frame<L> {
        match self.ctx.frame_mut() {
            Some(frame) => frame,
            None => unreachable!("activation of an inactive context"),
        }
    }

    /// the point this invocation continues from
    #[inline]
    pub fn point(&self) -> Point {
        self.frame().point
    }

    /// return true if the context was allocated by this invocation
    ///
    /// this is the invocation that should register the destructor
    pub fn is_fresh(&self) -> bool {
        self.fresh
    }

    /// the coroutine locals
    pub fn locals(&self) -> &L {
        &self.frame().locals
    }

    /// the coroutine locals
    pub fn locals_mut(&mut self) -> &mut L {
        &mut self.frame_mut().locals
    }

    /// move to another point without leaving the function
    ///
    /// this is how a body falls through from one segment to the next,
    /// loops back, or branches
    #[inline]
    pub fn jump(&mut self, to: Point) {
        self.frame_mut().point = to;
    }

    /// suspend the coroutine, handing `value` back to the caller
    ///
    /// the next invocation continues at `next`, the context stays active
    pub fn suspend<T>(mut self, next: Point, value: T) -> T {
        trace!("suspend {} -> {}", self.point(), next);
        self.frame_mut().point = next;
        value
    }

    /// complete the coroutine, handing `value` back to the caller
    ///
    /// the context is disposed before the value is returned: the nested
    /// context and the destructor have already run when the caller sees
    /// it, and the context is inactive
    pub fn complete<T>(mut self, value: T) -> T {
        trace!("complete at {}", self.point());
        self.ctx.dispose();
        value
    }

    /// register the destructor of this run
    ///
    /// it runs exactly once, when the context is released by completion,
    /// disposal or drop. register it at most once, in the fresh
    /// invocation; a later registration replaces the previous one, or is
    /// a usage error when
    /// [`Config::set_strict_destructor`](crate::Config::set_strict_destructor)
    /// is on
    pub fn set_destructor<F>(&mut self, f: F)
    where
        F: FnOnce(&mut L) + Send + 'static,
    {
        let frame = self.frame_mut();
        if frame.destructor.is_some() {
            if config().get_strict_destructor() {
                misuse(Misuse::DestructorOverwrite);
            }
            warn!("destructor replaced at {}", frame.point);
        }
        frame.destructor = Some(Box::new(f));
    }

    /// the context of a coroutine driven from inside this one
    ///
    /// it's owned by this context, so disposing this context disposes
    /// the nested one first, running its destructor. asking for a nested
    /// context with other locals than the current one cancels the current
    /// one and hands out a fresh context
    pub fn nested<M: Send + 'static>(&mut self) -> &mut Context<M> {
        self.frame_mut().nested.context::<M>()
    }

    /// report that the saved point is not handled by the body
    ///
    /// this is the catch-all arm of the dispatch, it never returns
    #[cold]
    pub fn unknown_point(self) -> ! {
        misuse(Misuse::UnknownPoint(self.point()))
    }
}

impl<'a, L> Deref for Activation<'a, L> {
    type Target = L;

    fn deref(&self) -> &L {
        self.locals()
    }
}

impl<'a, L> DerefMut for Activation<'a, L> {
    fn deref_mut(&mut self) -> &mut L {
        self.locals_mut()
    }
}

impl<'a, L> fmt::Debug for Activation<'a, L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Activation")
            .field("point", &self.point())
            .field("fresh", &self.fresh)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Default)]
    struct Counter {
        i: i32,
    }

    resume_points!(CHECK, NEXT);

    fn counter(ctx: &mut Context<Counter>) -> i32 {
        let mut co = ctx.enter();
        loop {
            match co.point() {
                Point::ENTRY => {
                    co.i = 0;
                    co.jump(CHECK);
                }
                CHECK => {
                    if co.i >= 10 {
                        return co.complete(-1);
                    }
                    let i = co.i;
                    return co.suspend(NEXT, i);
                }
                NEXT => {
                    co.i += 1;
                    co.jump(CHECK);
                }
                _ => co.unknown_point(),
            }
        }
    }

    #[derive(Default)]
    struct Inner {
        i: u32,
    }

    resume_points!(INNER_NEXT);

    // yields three times, completes on the fourth call
    fn inner(ctx: &mut Context<Inner>, hits: &Arc<AtomicUsize>) {
        let mut co = ctx.enter();
        if co.is_fresh() {
            let hits = hits.clone();
            co.set_destructor(move |_| {
                hits.fetch_add(1, Ordering::SeqCst);
            });
        }
        loop {
            match co.point() {
                Point::ENTRY => {
                    if co.i == 3 {
                        return co.complete(());
                    }
                    return co.suspend(INNER_NEXT, ());
                }
                INNER_NEXT => {
                    co.i += 1;
                    co.jump(Point::ENTRY);
                }
                _ => co.unknown_point(),
            }
        }
    }

    #[derive(Default)]
    struct Outer {
        runs: u32,
    }

    resume_points!(DRIVE, CHECK_INNER);

    // drive the inner coroutine to completion twice
    fn outer(ctx: &mut Context<Outer>, hits: &Arc<AtomicUsize>) -> u32 {
        let mut co = ctx.enter();
        loop {
            match co.point() {
                Point::ENTRY => co.jump(DRIVE),
                DRIVE => {
                    inner(co.nested(), hits);
                    return co.suspend(CHECK_INNER, 0);
                }
                CHECK_INNER => {
                    if co.nested::<Inner>().is_active() {
                        co.jump(DRIVE);
                        continue;
                    }
                    co.runs += 1;
                    if co.runs == 2 {
                        let runs = co.runs;
                        return co.complete(runs);
                    }
                    co.jump(DRIVE);
                }
                _ => co.unknown_point(),
            }
        }
    }

    #[test]
    fn sequential_replay() {
        let mut ctx = Context::new();
        let values: Vec<i32> = (0..11).map(|_| counter(&mut ctx)).collect();
        assert_eq!(values, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, -1]);
        assert!(!ctx.is_active());
    }

    #[test]
    fn restart_after_completion() {
        let mut ctx = Context::new();
        for _ in 0..11 {
            counter(&mut ctx);
        }
        assert_eq!(counter(&mut ctx), 0);
        assert!(ctx.is_active());
    }

    #[test]
    fn dispose_resets_instead_of_pausing() {
        let mut ctx = Context::new();
        assert_eq!(counter(&mut ctx), 0);
        ctx.dispose();
        assert!(!ctx.is_active());
        assert_eq!(counter(&mut ctx), 0);
        assert_eq!(counter(&mut ctx), 1);
    }

    #[test]
    fn suspend_saves_next_point() {
        let mut ctx = Context::new();
        counter(&mut ctx);
        assert_eq!(ctx.point(), Some(NEXT));
    }

    #[test]
    fn fresh_only_on_allocation() {
        let mut ctx = Context::<Counter>::new();
        assert!(ctx.enter().is_fresh());
        assert!(!ctx.enter().is_fresh());
        ctx.dispose();
        assert!(ctx.enter().is_fresh());
    }

    #[test]
    fn dropped_activation_keeps_point() {
        let mut ctx = Context::<Counter>::new();
        {
            let mut co = ctx.enter();
            co.i = 5;
            co.jump(CHECK);
        }
        assert_eq!(ctx.point(), Some(CHECK));
        assert_eq!(counter(&mut ctx), 5);
    }

    #[test]
    fn locals_accessors_match_deref() {
        let mut ctx = Context::<Counter>::new();
        let mut co = ctx.enter();
        co.locals_mut().i = 4;
        assert_eq!(co.locals().i, 4);
        assert_eq!(co.i, 4);
        assert_eq!(format!("{:?}", co), "Activation { point: Point(0), fresh: true }");
    }

    #[test]
    fn complete_runs_destructor_before_returning() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut ctx = Context::new();
        for _ in 0..3 {
            inner(&mut ctx, &hits);
            assert_eq!(hits.load(Ordering::SeqCst), 0);
        }
        inner(&mut ctx, &hits);
        assert!(!ctx.is_active());
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        ctx.dispose();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn destructor_overwrite_keeps_the_last() {
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));
        let mut ctx = Context::<Counter>::new();
        {
            let mut co = ctx.enter();
            let first = first.clone();
            co.set_destructor(move |_| {
                first.fetch_add(1, Ordering::SeqCst);
            });
            let second = second.clone();
            co.set_destructor(move |_| {
                second.fetch_add(1, Ordering::SeqCst);
            });
        }
        ctx.dispose();
        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn nested_runs_to_completion_twice() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut ctx = Context::new();
        let mut calls = 0;
        let runs = loop {
            calls += 1;
            let r = outer(&mut ctx, &hits);
            if !ctx.is_active() {
                break r;
            }
        };
        assert_eq!(runs, 2);
        // four inner steps per run, each followed by one outer suspension
        assert_eq!(calls, 9);
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn dispose_cancels_nested_first() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut ctx = Context::new();
        outer(&mut ctx, &hits);
        outer(&mut ctx, &hits);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        ctx.dispose();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        ctx.dispose();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn points_display_their_ordinal() {
        assert_eq!(Point::ENTRY.get(), 0);
        assert_eq!(CHECK.get(), 1);
        assert_eq!(NEXT.get(), 2);
        assert_eq!(NEXT.to_string(), "#2");
    }
}
