//! Run results and diagnostics
//!
//! Everything a run produces besides the screenshots themselves: the
//! pass/fail outcome, which step failed, the ordered artifact list, and the
//! diagnostic log. Serializable so the CLI can emit it as JSON.

use crate::runner::step::StepRef;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

/// A captured evidence screenshot
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    /// Artifact label (screenshot name, or `error` for the failure capture)
    pub label: String,
    /// Where the PNG was written
    pub path: PathBuf,
    /// File size in bytes
    pub bytes: u64,
}

/// Outcome of one verification run
#[derive(Debug, Serialize)]
pub struct VerificationResult {
    /// Whether every non-screenshot step succeeded
    pub succeeded: bool,
    /// The step that aborted the run, if any
    pub failed_step: Option<StepRef>,
    /// Screenshots captured, in capture order
    pub artifacts: Vec<Artifact>,
    /// Ordered diagnostic messages from the run
    pub diagnostic_log: Vec<String>,
}

impl VerificationResult {
    /// One-line summary for log output
    pub fn summary(&self) -> String {
        match &self.failed_step {
            None => format!(
                "verification succeeded, {} artifact(s) captured",
                self.artifacts.len()
            ),
            Some(step) => format!(
                "verification failed at step {} ({}): {}, {} artifact(s) captured",
                step.index,
                step.kind,
                step.detail,
                self.artifacts.len()
            ),
        }
    }
}

/// Ordered diagnostic log that also mirrors entries to tracing
#[derive(Debug, Default)]
pub(crate) struct DiagnosticLog {
    entries: Vec<String>,
}

impl DiagnosticLog {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn note<S: Into<String>>(&mut self, message: S) {
        let message = message.into();
        info!("{message}");
        self.entries.push(message);
    }

    pub(crate) fn into_entries(self) -> Vec<String> {
        self.entries
    }
}
