//! Per-task outcomes: the structured result every dependency task returns.

use std::path::PathBuf;

use jarfetch_maven::checksum::{Algo, Mismatch};
use jarfetch_maven::coordinate::Dependency;
use jarfetch_maven::error::{FetchError, TransportError};
use thiserror::Error;

/// Why a dependency task failed.
///
/// `Clone` on purpose: results flow through shared futures with multiple
/// waiters, so everything they carry is owned and clonable.
#[derive(Debug, Clone, Error)]
pub enum DownloadError {
    /// Timeout or DNS failure. Non-fatal against a single repository, fatal
    /// once it terminates the only viable download.
    #[error("connection failed: {message}")]
    Connectivity { message: String },

    /// The artifact URL answered 404.
    #[error("{url} not found")]
    NotFound { url: String },

    /// Malformed XML in a metadata or descriptor document.
    #[error("malformed document at {url}: {message}")]
    Parse { url: String, message: String },

    /// A non-404 transfer failure (HTTP error status, truncated body).
    #[error("transfer failed: {message}")]
    Transfer { message: String },

    /// Downloaded bytes disagreed with a required digest.
    #[error("{algo} checksum mismatch: expected {expected}, got {actual}")]
    Checksum {
        algo: Algo,
        expected: String,
        actual: String,
    },

    /// Writing the artifact into the local tree failed.
    #[error("failed to install {path}: {message}")]
    Install { path: String, message: String },

    /// Every candidate repository was tried without success.
    #[error("{coordinate} not found in any repository")]
    Exhausted { coordinate: String },

    /// The task was cancelled or panicked before producing a result.
    #[error("task aborted: {message}")]
    Aborted { message: String },
}

impl DownloadError {
    /// Whether the repository host was unreachable, as opposed to the
    /// artifact being missing, broken, or corrupt.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }

    /// Failures that no other repository can repair.
    pub(crate) fn is_fatal(&self) -> bool {
        matches!(self, Self::Checksum { .. } | Self::Install { .. })
    }
}

impl From<TransportError> for DownloadError {
    fn from(err: TransportError) -> Self {
        if err.is_connectivity() {
            Self::Connectivity {
                message: err.to_string(),
            }
        } else {
            Self::Transfer {
                message: err.to_string(),
            }
        }
    }
}

impl From<FetchError> for DownloadError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Transport(t) => t.into(),
            FetchError::Parse { url, message } => Self::Parse { url, message },
        }
    }
}

impl From<Mismatch> for DownloadError {
    fn from(m: Mismatch) -> Self {
        Self::Checksum {
            algo: m.algo,
            expected: m.expected,
            actual: m.actual,
        }
    }
}

/// The outcome of one dependency task.
///
/// Constructed exactly once per task. `transitive` holds child outcomes in
/// submission order; failed optional children are dropped by the parent,
/// failed required children stay visible without failing the parent.
#[derive(Debug, Clone)]
pub struct DownloadResult {
    pub dependency: Dependency,
    /// Where the binary artifact lives (or would live) in the local tree.
    pub local_path: PathBuf,
    pub optional: bool,
    pub error: Option<DownloadError>,
    pub transitive: Vec<DownloadResult>,
}

impl DownloadResult {
    pub fn success(
        dependency: Dependency,
        local_path: PathBuf,
        optional: bool,
        transitive: Vec<DownloadResult>,
    ) -> Self {
        Self {
            dependency,
            local_path,
            optional,
            error: None,
            transitive,
        }
    }

    pub fn failure(
        dependency: Dependency,
        local_path: PathBuf,
        optional: bool,
        error: DownloadError,
    ) -> Self {
        Self {
            dependency,
            local_path,
            optional,
            error: Some(error),
            transitive: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// All failed results in this subtree, depth-first, including this one.
    pub fn failures(&self) -> Vec<&DownloadResult> {
        let mut out = Vec::new();
        self.collect_failures(&mut out);
        out
    }

    fn collect_failures<'a>(&'a self, out: &mut Vec<&'a DownloadResult>) {
        if !self.is_success() {
            out.push(self);
        }
        for child in &self.transitive {
            child.collect_failures(out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jarfetch_maven::coordinate::Coordinate;

    fn dep(name: &str) -> Dependency {
        Dependency::new(Coordinate::new("org.example", name, "1.0"), true)
    }

    #[test]
    fn success_has_no_error() {
        let r = DownloadResult::success(dep("a"), PathBuf::from("/x"), false, vec![]);
        assert!(r.is_success());
        assert!(r.failures().is_empty());
    }

    #[test]
    fn failures_walk_the_subtree() {
        let leaf = DownloadResult::failure(
            dep("c"),
            PathBuf::from("/c"),
            false,
            DownloadError::Exhausted {
                coordinate: "org.example:c:1.0".into(),
            },
        );
        let root = DownloadResult::success(dep("a"), PathBuf::from("/a"), false, vec![leaf]);
        let failures = root.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].dependency.coordinate.artifact_id, "c");
    }

    #[test]
    fn fatal_classification() {
        assert!(DownloadError::Checksum {
            algo: Algo::Sha1,
            expected: "a".into(),
            actual: "b".into()
        }
        .is_fatal());
        assert!(!DownloadError::NotFound { url: "u".into() }.is_fatal());
        assert!(!DownloadError::Connectivity {
            message: "m".into()
        }
        .is_fatal());
    }
}
