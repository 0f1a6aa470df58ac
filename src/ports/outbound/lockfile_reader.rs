use crate::scanning::domain::{Lockfile, LockfileFormat};
use crate::shared::Result;
use std::path::{Path, PathBuf};

/// A lockfile located in a project directory and parsed into the canonical model
#[derive(Debug, Clone)]
pub struct LoadedLockfile {
    pub format: LockfileFormat,
    pub path: PathBuf,
    pub lockfile: Lockfile,
}

/// LockfileReader port for locating and parsing a project's lockfile
///
/// This port abstracts format detection, reading from disk and any external
/// tool invocation needed to decode the lockfile.
pub trait LockfileReader {
    /// Detects the lockfile format in a project directory and parses it
    ///
    /// # Arguments
    /// * `project_path` - Path to the project directory
    ///
    /// # Returns
    /// The detected format, the lockfile path and the canonical lockfile
    ///
    /// # Errors
    /// Returns an error if:
    /// - No supported lockfile exists in the directory
    /// - The lockfile exists but cannot be decoded
    /// - The external tool required for the format cannot be launched
    fn read_lockfile(&self, project_path: &Path) -> Result<LoadedLockfile>;
}
