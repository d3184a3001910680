//! `coro_ctx` Configuration interface
//!

use std::sync::atomic::{AtomicBool, Ordering};

// default configs
const DEFAULT_ABORT_ON_MISUSE: bool = true;
const DEFAULT_STRICT_DESTRUCTOR: bool = false;

static ABORT_ON_MISUSE: AtomicBool = AtomicBool::new(DEFAULT_ABORT_ON_MISUSE);
static STRICT_DESTRUCTOR: AtomicBool = AtomicBool::new(DEFAULT_STRICT_DESTRUCTOR);

/// `coro_ctx` Configuration type
pub struct Config;

/// get the coro_ctx configuration instance
pub fn config() -> Config {
    Config
}

/// the config is process wide
///
/// it's meant to be set once at the program beginning, contexts that
/// are already suspended pick up the new values on their next resume
impl Config {
    /// set whether a usage error aborts the process
    ///
    /// when disabled the usage error is raised as a panic carrying a
    /// [`Misuse`](crate::Misuse) payload instead, so that a host that
    /// isolates failures with `catch_unwind` can observe it
    pub fn set_abort_on_misuse(&self, abort: bool) -> &Self {
        info!("set abort on misuse={:?}", abort);
        ABORT_ON_MISUSE.store(abort, Ordering::Release);
        self
    }

    /// get whether a usage error aborts the process
    pub fn get_abort_on_misuse(&self) -> bool {
        ABORT_ON_MISUSE.load(Ordering::Acquire)
    }

    /// set whether registering a second destructor is a usage error
    ///
    /// by default the newer destructor silently replaces the older one
    /// and only a warning is logged
    pub fn set_strict_destructor(&self, strict: bool) -> &Self {
        info!("set strict destructor={:?}", strict);
        STRICT_DESTRUCTOR.store(strict, Ordering::Release);
        self
    }

    /// get whether registering a second destructor is a usage error
    pub fn get_strict_destructor(&self) -> bool {
        STRICT_DESTRUCTOR.load(Ordering::Acquire)
    }
}
