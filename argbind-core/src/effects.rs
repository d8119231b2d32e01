//! Side effects of the parser facade: process termination and console output.
//!
//! Both are injected so the parser can be embedded and tested without exiting
//! the process or writing to the real terminal.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

/// Exit status used after printing the help text.
pub const EXIT_HELP: i32 = 0;

/// Exit status used after a fatal sanity, bind or validation failure.
pub const EXIT_FAILURE: i32 = -1;

/// Termination effect invoked after help or a fatal error.
pub trait Terminate {
    fn terminate(&self, status: i32);
}

impl<F: Fn(i32)> Terminate for F {
    fn terminate(&self, status: i32) {
        self(status)
    }
}

/// Exits the process.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminate for ProcessExit {
    fn terminate(&self, status: i32) {
        std::process::exit(status)
    }
}

/// Destination for help text and diagnostics.
pub trait Console {
    /// Regular output (help text).
    fn out(&self, text: &str);

    /// Diagnostics.
    fn err(&self, text: &str);
}

/// Writes to the process's stdout and stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn out(&self, text: &str) {
        let mut stdout = std::io::stdout().lock();
        // Best effort.
        let _ = stdout.write_all(text.as_bytes());
        let _ = stdout.flush();
    }

    fn err(&self, text: &str) {
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(text.as_bytes());
        let _ = stderr.flush();
    }
}

/// Collects output in memory. Clones share the same buffers.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    out: Arc<Mutex<String>>,
    err: Arc<Mutex<String>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written with [`Console::out`] so far.
    pub fn stdout(&self) -> String {
        self.out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Everything written with [`Console::err`] so far.
    pub fn stderr(&self) -> String {
        self.err
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Console for MemoryConsole {
    fn out(&self, text: &str) {
        self.out
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }

    fn err(&self, text: &str) {
        self.err
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_str(text);
    }
}
