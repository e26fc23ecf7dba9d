//! Process entry: run the generated program exactly once.
//!
//! # Exit status
//!
//! The entry symbol returns nothing, so the process reports success
//! ([`EXIT_STATUS`]) whenever the program returns. Abnormal ends (allocation
//! failure, signals) never reach the trampoline's return.

use crate::diagnostics;
use molki_config::{Config, ConfigLoader};
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tracing::{info, warn};

/// Status `main` returns after the entry symbol returns.
pub const EXIT_STATUS: i32 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntryError {
    #[error("the program entry point has already been started")]
    AlreadyStarted,
}

/// Hands control to the generated program.
pub struct Trampoline {
    entry: extern "C" fn(),
    started: AtomicBool,
}

impl Trampoline {
    pub const fn new(entry: extern "C" fn()) -> Self {
        Self {
            entry,
            started: AtomicBool::new(false),
        }
    }

    /// Whether `run` has been called
    pub fn has_started(&self) -> bool {
        self.started.load(Ordering::Acquire)
    }

    /// Set up diagnostics, call the entry, flush standard output.
    ///
    /// A second call returns [`EntryError::AlreadyStarted`] without calling
    /// the entry again.
    pub fn run(&self) -> Result<i32, EntryError> {
        if self.started.swap(true, Ordering::AcqRel) {
            return Err(EntryError::AlreadyStarted);
        }

        init_diagnostics();

        info!("entering generated program");
        (self.entry)();
        info!("generated program returned");

        // Rust's stdout buffer is not flushed by the C runtime's exit path.
        crate::io::flush(&mut io::stdout().lock());
        Ok(EXIT_STATUS)
    }
}

/// Load configuration and install the stderr subscriber. Problems here never
/// stop the program: fall back to defaults and say so.
fn init_diagnostics() {
    let (config, load_error) = match ConfigLoader::new().load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };

    if let Err(e) = diagnostics::install(&config) {
        let _ = writeln!(io::stderr(), "molki-runtime: {}", e);
    }
    if let Some(e) = load_error {
        warn!(error = %e, "ignoring runtime configuration");
    }
}

#[cfg(feature = "entry")]
mod process_main {
    use super::Trampoline;
    use std::os::raw::{c_char, c_int};

    extern "C" {
        fn __minijava_main();
    }

    extern "C" fn program() {
        // SAFETY: `__minijava_main` is provided by the link step and follows
        // the `abi::ENTRY` signature.
        unsafe { __minijava_main() }
    }

    static PROGRAM: Trampoline = Trampoline::new(program);

    #[unsafe(no_mangle)]
    pub extern "C" fn main(_argc: c_int, _argv: *const *const c_char) -> c_int {
        PROGRAM.run().unwrap_or(1)
    }
}
