use crate::application::dto::ScanResponse;
use crate::ports::outbound::ReportFormatter;
use crate::scanning::domain::{Finding, Severity};
use crate::shared::Result;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Report<'a> {
    tool: Tool<'a>,
    scanned_at: String,
    project: Project<'a>,
    blocklist: BlocklistInfo<'a>,
    summary: Summary,
    findings: Vec<FindingView<'a>>,
}

#[derive(Debug, Serialize)]
struct Tool<'a> {
    name: &'static str,
    version: &'a str,
}

#[derive(Debug, Serialize)]
struct Project<'a> {
    name: &'a str,
    version: &'a str,
    lockfile: LockfileInfo,
}

#[derive(Debug, Serialize)]
struct LockfileInfo {
    format: &'static str,
    path: String,
    version: i64,
}

#[derive(Debug, Serialize)]
struct BlocklistInfo<'a> {
    location: &'a str,
    entries: usize,
}

#[derive(Debug, Serialize)]
struct Summary {
    total_packages: usize,
    direct_dependencies: usize,
    transitive_dependencies: usize,
    unreachable_packages: usize,
    issues_found: usize,
    ignored: usize,
    by_severity: SeverityCounts,
    fail_on: Severity,
    failed: bool,
}

#[derive(Debug, Serialize)]
struct SeverityCounts {
    critical: usize,
    high: usize,
    medium: usize,
    low: usize,
    info: usize,
}

#[derive(Debug, Serialize)]
struct FindingView<'a> {
    package: &'a str,
    version: &'a str,
    install_path: &'a str,
    severity: Severity,
    reason: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    cve: Option<&'a str>,
    dependency_type: &'static str,
    /// `null` when unreachable
    depth: Option<usize>,
    /// `null` when unreachable
    path: Option<&'a [String]>,
}

impl<'a> From<&'a Finding> for FindingView<'a> {
    fn from(finding: &'a Finding) -> Self {
        Self {
            package: finding.package_name(),
            version: finding.version(),
            install_path: finding.package_key(),
            severity: finding.severity(),
            reason: finding.reason(),
            cve: finding.cve(),
            dependency_type: if finding.is_direct() {
                "direct"
            } else {
                "transitive"
            },
            depth: finding.depth().value(),
            path: finding.path(),
        }
    }
}

/// JsonFormatter adapter rendering the scan report as pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format(&self, response: &ScanResponse) -> Result<String> {
        let report = Report {
            tool: Tool {
                name: "hulud-scan",
                version: &response.tool_version,
            },
            scanned_at: response.scanned_at.to_rfc3339(),
            project: Project {
                name: &response.project.name,
                version: &response.project.version,
                lockfile: LockfileInfo {
                    format: response.project.lockfile_format.display_name(),
                    path: response.project.lockfile_path.display().to_string(),
                    version: response.project.format_version,
                },
            },
            blocklist: BlocklistInfo {
                location: &response.blocklist_location,
                entries: response.blocklist_size,
            },
            summary: Summary {
                total_packages: response.total_packages,
                direct_dependencies: response.direct_count,
                transitive_dependencies: response.transitive_count,
                unreachable_packages: response.unreachable_count,
                issues_found: response.findings.len(),
                ignored: response.ignored_count,
                by_severity: SeverityCounts {
                    critical: response.count_by_severity(Severity::Critical),
                    high: response.count_by_severity(Severity::High),
                    medium: response.count_by_severity(Severity::Medium),
                    low: response.count_by_severity(Severity::Low),
                    info: response.count_by_severity(Severity::Info),
                },
                fail_on: response.fail_on,
                failed: response.has_findings_at_or_above_threshold,
            },
            findings: response.findings.iter().map(FindingView::from).collect(),
        };

        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        Ok(json)
    }
}
