use crate::scanning::domain::Severity;
use std::path::PathBuf;

/// ScanRequest - Internal request DTO for the scan use case
#[derive(Debug, Clone)]
pub struct ScanRequest {
    /// Project directory containing the lockfile
    pub project_path: PathBuf,
    /// URL or path of the blocklist CSV
    pub blocklist_location: String,
    /// Packages to leave out of the findings, as `name` or `name@version`
    pub ignore_packages: Vec<String>,
    /// Lowest severity that makes the scan fail
    pub fail_on: Severity,
}

impl ScanRequest {
    pub fn new(
        project_path: PathBuf,
        blocklist_location: impl Into<String>,
        ignore_packages: Vec<String>,
        fail_on: Severity,
    ) -> Self {
        Self {
            project_path,
            blocklist_location: blocklist_location.into(),
            ignore_packages,
            fail_on,
        }
    }

    /// Whether `name@version` matches one of the ignore patterns.
    pub fn is_ignored(&self, name: &str, version: &str) -> bool {
        self.ignore_packages.iter().any(|pattern| {
            let pattern = pattern.trim();
            // "@scope/name" has a leading '@' that is not a version separator
            match pattern.rfind('@').filter(|&at| at > 0) {
                Some(at) => &pattern[..at] == name && &pattern[at + 1..] == version,
                None => pattern == name,
            }
        })
    }
}
