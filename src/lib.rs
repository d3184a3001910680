//! # Stackless Resumable Functions
//!
//! `coro_ctx` turns ordinary functions into coroutines that can suspend in
//! the middle of their body, hand a value back to the caller, and continue
//! where they left off on the next call, without a stack of their own.
//!
//! The state that has to survive a suspension lives in a [`Context`] owned by
//! the caller. The coroutine allocates it lazily on its first invocation and
//! releases it when it completes or when the caller cancels it with
//! [`Context::dispose`].
//!
//! ## Features
//!
//! * Lazily allocated, reusable contexts with a plain liveness query
//! * Explicit resumption points declared with [`resume_points!`]
//! * Exactly-once destructors that also run on cancellation
//! * Nested contexts for coroutines that drive other coroutines, released
//!   innermost first
//! * Small helpers for the caller side loop in [`drive`](mod@drive)
//!
//! ## Example
//!
//! ```
//! use coro_ctx::{resume_points, Context, Point};
//!
//! #[derive(Default)]
//! struct Echo {
//!     calls: u32,
//! }
//!
//! resume_points!(AGAIN);
//!
//! // yields its argument once, then completes with the number of calls
//! fn echo(ctx: &mut Context<Echo>, v: u32) -> u32 {
//!     let mut co = ctx.enter();
//!     co.calls += 1;
//!     match co.point() {
//!         Point::ENTRY => co.suspend(AGAIN, v),
//!         AGAIN => {
//!             let calls = co.calls;
//!             co.complete(calls)
//!         }
//!         _ => co.unknown_point(),
//!     }
//! }
//!
//! let mut ctx = Context::new();
//! assert_eq!(echo(&mut ctx, 7), 7);
//! assert!(ctx.is_active());
//! assert_eq!(echo(&mut ctx, 7), 2);
//! assert!(!ctx.is_active());
//! ```
//!
//! Coroutines are driven by the caller only. Invocations of one context must
//! not overlap; distinct contexts are independent of each other.

#[macro_use]
#[doc(hidden)]
extern crate log;

#[macro_use]
mod macros;
mod cancel;
mod config;
mod context;
mod error;
mod local;

pub mod coroutine;
pub mod drive;

pub use cancel::Destructor;
pub use config::{config, Config};
pub use context::Context;
pub use coroutine::{Activation, Point};
pub use drive::{drive, run_to_completion, step, Step};
pub use error::Misuse;
