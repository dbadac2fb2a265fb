use std::path::{Path, PathBuf};

use serde::Serialize;

/// Outcome of a best-effort cleanup.
///
/// Failures never abort a cleanup; they are collected here instead.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    /// Files whose content was rewritten (config section, import lines).
    pub patched: Vec<PathBuf>,
    pub failures: Vec<CleanupFailure>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub reason: String,
}

impl CleanupReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_removed(&mut self, path: impl Into<PathBuf>) {
        self.removed.push(path.into());
    }

    pub fn record_patched(&mut self, path: impl Into<PathBuf>) {
        self.patched.push(path.into());
    }

    pub fn record_failure(&mut self, path: impl Into<PathBuf>, reason: impl Into<String>) {
        self.failures.push(CleanupFailure {
            path: path.into(),
            reason: reason.into(),
        });
    }

    pub fn merge(&mut self, other: CleanupReport) {
        self.removed.extend(other.removed);
        self.patched.extend(other.patched);
        self.failures.extend(other.failures);
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn was_removed(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.removed.iter().any(|p| p == path)
    }

    pub fn touched_anything(&self) -> bool {
        !self.removed.is_empty() || !self.patched.is_empty()
    }
}
