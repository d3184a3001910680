use std::error::Error;
use std::fmt;
use std::panic;
use std::process;

use crate::config::config;
use crate::coroutine::Point;

/// A coroutine usage error.
///
/// These never describe a runtime condition, only a defect in the code
/// that authors or drives a coroutine. They are not returned to the
/// caller: see [`Config::set_abort_on_misuse`](crate::Config::set_abort_on_misuse)
/// for how they surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Misuse {
    /// a coroutine was invoked without a context
    MissingContext,
    /// the saved resumption point is not handled by the coroutine body
    UnknownPoint(Point),
    /// a second destructor was registered while strict mode is on
    DestructorOverwrite,
}

impl fmt::Display for Misuse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Misuse::MissingContext => write!(f, "coroutine invoked without a context"),
            Misuse::UnknownPoint(p) => write!(f, "coroutine resumed at unknown point {}", p),
            Misuse::DestructorOverwrite => write!(f, "coroutine destructor registered twice"),
        }
    }
}

impl Error for Misuse {}

// a usage error can't be recovered by the coroutine itself
// either take the process down or unwind to whoever can isolate it
#[cold]
#[inline(never)]
pub(crate) fn misuse(kind: Misuse) -> ! {
    error!("coroutine usage error: {}", kind);
    if config().get_abort_on_misuse() {
        process::abort();
    }
    panic::panic_any(kind)
}
