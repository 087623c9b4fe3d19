//! Host message channel.
//!
//! Reporters receive the human-readable progress of a run: which paths were
//! found, every command line before it runs, every child's output after it
//! exits, and the final success or failure message. Reporting never fails a
//! run.

use parking_lot::RwLock;
use std::io::Write;
use tracing::{debug, info, Level};

/// A write-only, line-oriented message sink.
pub trait Reporter: Send + Sync {
    /// Emits one message. Must not panic or fail.
    fn message(&self, text: &str);
}

/// A reporter that discards all messages.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReporter;

impl Reporter for NoOpReporter {
    fn message(&self, _text: &str) {}
}

/// Writes messages to standard output, mirrored to `tracing` at debug level.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    /// Creates a console reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Reporter for ConsoleReporter {
    fn message(&self, text: &str) {
        debug!(target: "lasflow::host", "{}", text);
        let mut stdout = std::io::stdout().lock();
        // A closed stdout must not abort the run.
        let _ = writeln!(stdout, "{text}");
        let _ = stdout.flush();
    }
}

/// Sends messages to `tracing` only.
#[derive(Debug, Clone)]
pub struct TracingReporter {
    level: Level,
}

impl Default for TracingReporter {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl TracingReporter {
    /// Creates a tracing reporter with the specified level.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level reporter.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }
}

impl Reporter for TracingReporter {
    fn message(&self, text: &str) {
        if self.level == Level::DEBUG {
            debug!(target: "lasflow::host", "{}", text);
        } else {
            info!(target: "lasflow::host", "{}", text);
        }
    }
}

/// A reporter that keeps every message, for tests.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    messages: RwLock<Vec<String>>,
}

impl CollectingReporter {
    /// Creates a new collecting reporter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all collected messages.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages.read().clone()
    }

    /// Returns the last message, if any.
    #[must_use]
    pub fn last(&self) -> Option<String> {
        self.messages.read().last().cloned()
    }

    /// Returns true if any message contains `needle`.
    #[must_use]
    pub fn contains(&self, needle: &str) -> bool {
        self.messages.read().iter().any(|m| m.contains(needle))
    }

    /// Returns the number of collected messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.read().len()
    }

    /// Returns true if nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.read().is_empty()
    }
}

impl Reporter for CollectingReporter {
    fn message(&self, text: &str) {
        self.messages.write().push(text.to_string());
    }
}
