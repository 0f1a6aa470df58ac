use std::path::Path;
use hulud_scan::prelude::*;
use hulud_scan::shared::error::ScanError;

/// Mock LockfileReader serving a prebuilt lockfile
pub struct MockLockfileReader {
    pub lockfile: Lockfile,
    pub format: LockfileFormat,
    pub should_fail: bool,
}

impl MockLockfileReader {
    pub fn new(lockfile: Lockfile) -> Self {
        Self {
            lockfile,
            format: LockfileFormat::Npm,
            should_fail: false,
        }
    }

    pub fn with_format(mut self, format: LockfileFormat) -> Self {
        self.format = format;
        self
    }

    /// Reader that behaves as if the project had no lockfile
    pub fn with_failure() -> Self {
        Self {
            lockfile: Lockfile::new("missing", "0.0.0", 0),
            format: LockfileFormat::Npm,
            should_fail: true,
        }
    }
}

impl LockfileReader for MockLockfileReader {
    fn read_lockfile(&self, project_path: &Path) -> Result<LoadedLockfile> {
        if self.should_fail {
            return Err(ScanError::LockfileNotFound {
                path: project_path.to_path_buf(),
                suggestion: "Mock lockfile read failure".to_string(),
            }
            .into());
        }
        Ok(LoadedLockfile {
            format: self.format,
            path: project_path.join(self.format.filename()),
            lockfile: self.lockfile.clone(),
        })
    }
}
