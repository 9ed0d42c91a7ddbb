//! Diagnostic events describing intermediate extraction state.
//!
//! Events are only produced when debugging is enabled and are handed to a
//! [`DiagnosticSink`] chosen by the caller.

use std::fmt;
use std::sync::Mutex;

use serde::Serialize;
use tracing::debug;

use crate::models::record::CoilRecord;

/// Intermediate state of one extraction step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Tokens of a row with the horizontal key used for column clustering.
    RowTokens { row: usize, tokens: Vec<(String, f32)> },
    /// Columns of a row, each rendered as its space-joined tokens.
    Columns { row: usize, columns: Vec<String> },
    /// A batch-ID found only by a fallback strategy.
    BatchFallback { strategy: String, value: String },
    /// A record produced by a row or a line.
    Hit { record: CoilRecord },
    /// A plain line without batch-ID, passed through as text.
    LineDegraded { line: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::RowTokens { row, tokens } => {
                write!(f, "row {row} tokens:")?;
                for (token, x) in tokens {
                    write!(f, " ({token}, {x:.2})")?;
                }
                Ok(())
            }
            Diagnostic::Columns { row, columns } => {
                write!(f, "row {row} columns: [{}]", columns.join(" | "))
            }
            Diagnostic::BatchFallback { strategy, value } => {
                write!(f, "batch fallback {strategy}: {value}")
            }
            Diagnostic::Hit { record } => write!(f, "hit: {}", record.fields().join(" ")),
            Diagnostic::LineDegraded { line } => write!(f, "no batch-ID, kept line: {line}"),
        }
    }
}

/// Receiver of diagnostic events.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: &Diagnostic);
}

/// Logs diagnostics at debug level under the `steelq::diagnostics` target.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        debug!(target: "steelq::diagnostics", "{}", diagnostic);
    }
}

/// Discards diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: &Diagnostic) {}
}

/// Keeps diagnostics in memory, e.g. to attach them to a report.
#[derive(Debug, Default)]
pub struct CollectingSink {
    events: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the collected events, leaving the sink empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        match self.events.lock() {
            Ok(mut events) => std::mem::take(&mut *events),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl DiagnosticSink for CollectingSink {
    fn emit(&self, diagnostic: &Diagnostic) {
        let mut events = match self.events.lock() {
            Ok(events) => events,
            Err(poisoned) => poisoned.into_inner(),
        };
        events.push(diagnostic.clone());
    }
}
