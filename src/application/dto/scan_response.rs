use crate::scanning::domain::{Finding, LockfileFormat, Severity};
use chrono::{DateTime, Utc};
use std::path::PathBuf;

/// Project and lockfile facts reported alongside the findings
#[derive(Debug, Clone)]
pub struct ProjectSummary {
    pub name: String,
    pub version: String,
    pub lockfile_format: LockfileFormat,
    pub lockfile_path: PathBuf,
    pub format_version: i64,
}

/// ScanResponse - Internal response DTO from the scan use case
///
/// Formatters render this; `main` derives the exit code from
/// `has_findings_at_or_above_threshold`.
#[derive(Debug, Clone)]
pub struct ScanResponse {
    pub project: ProjectSummary,
    /// Findings after ignore patterns were applied, highest severity first
    pub findings: Vec<Finding>,
    /// Number of findings dropped by ignore patterns
    pub ignored_count: usize,
    pub total_packages: usize,
    pub direct_count: usize,
    pub transitive_count: usize,
    pub unreachable_count: usize,
    pub blocklist_location: String,
    pub blocklist_size: usize,
    pub fail_on: Severity,
    /// Whether any finding is at or above `fail_on`
    pub has_findings_at_or_above_threshold: bool,
    pub scanned_at: DateTime<Utc>,
    pub tool_version: String,
}

impl ScanResponse {
    /// Number of findings with exactly `severity`.
    pub fn count_by_severity(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.severity() == severity)
            .count()
    }

    pub fn has_findings(&self) -> bool {
        !self.findings.is_empty()
    }
}
