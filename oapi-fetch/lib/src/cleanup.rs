//! Removes the bookkeeping files the generator leaves behind.
//!
//! Cleanup is best-effort: every target is attempted, a missing target
//! counts as already clean, and a failure on one target is recorded without
//! stopping the others.

use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

/// Generator scratch directory under the output directory.
pub const SCRATCH_DIR: &str = ".openapi-generator";

/// Generator ignore-file marker under the output directory.
pub const IGNORE_FILE: &str = ".openapi-generator-ignore";

/// Tool config written to the invocation's working directory.
pub const TOOL_CONFIG_FILE: &str = "openapitools.json";

/// A path to remove and how to remove it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupTarget {
    /// Removed recursively.
    Directory(PathBuf),
    File(PathBuf),
}

impl CleanupTarget {
    pub fn path(&self) -> &Path {
        match self {
            CleanupTarget::Directory(path) | CleanupTarget::File(path) => path,
        }
    }

    fn remove(&self) -> io::Result<()> {
        match self {
            CleanupTarget::Directory(path) => std::fs::remove_dir_all(path),
            CleanupTarget::File(path) => std::fs::remove_file(path),
        }
    }
}

/// A target that could not be removed.
#[derive(Debug)]
pub struct CleanupFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

/// What happened to each cleanup target.
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub removed: Vec<PathBuf>,
    /// Targets that did not exist.
    pub absent: Vec<PathBuf>,
    pub failed: Vec<CleanupFailure>,
}

impl CleanupReport {
    /// Returns `true` when no target failed.
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// The three generator artifacts, in removal order.
pub fn cleanup_targets(output_dir: &Path, working_dir: &Path) -> [CleanupTarget; 3] {
    [
        CleanupTarget::Directory(output_dir.join(SCRATCH_DIR)),
        CleanupTarget::File(output_dir.join(IGNORE_FILE)),
        CleanupTarget::File(working_dir.join(TOOL_CONFIG_FILE)),
    ]
}

/// Removes every generator artifact, continuing past failures.
pub fn remove_artifacts(output_dir: &Path, working_dir: &Path) -> CleanupReport {
    let mut report = CleanupReport::default();

    for target in cleanup_targets(output_dir, working_dir) {
        let path = target.path().to_path_buf();
        match target.remove() {
            Ok(()) => {
                debug!(path = %path.display(), "Removed generator artifact");
                report.removed.push(path);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => report.absent.push(path),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Could not remove generator artifact");
                report.failed.push(CleanupFailure { path, error });
            }
        }
    }

    report
}
