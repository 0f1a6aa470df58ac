use crate::application::dto::ScanResponse;
use crate::ports::outbound::ReportFormatter;
use crate::scanning::domain::{Finding, Severity};
use crate::shared::Result;
use owo_colors::OwoColorize;
use std::fmt::Write;

const RULE_WIDTH: usize = 60;
const PATH_SEPARATOR: &str = " → ";

/// TableFormatter adapter rendering a human-readable scan report
///
/// Lists each finding with its dependency type, the path from the project
/// root, the blocklist reason and CVE. Severities are coloured only when
/// `colored` is set.
pub struct TableFormatter {
    colored: bool,
}

impl TableFormatter {
    pub fn new() -> Self {
        Self { colored: false }
    }

    /// Formatter that emits ANSI colours
    pub fn with_colors(colored: bool) -> Self {
        Self { colored }
    }

    fn severity_label(&self, severity: Severity) -> String {
        let label = severity.as_str().to_uppercase();
        if !self.colored {
            return label;
        }
        match severity {
            Severity::Critical => label.red().bold().to_string(),
            Severity::High => label.red().to_string(),
            Severity::Medium => label.yellow().to_string(),
            Severity::Low => label.blue().to_string(),
            Severity::Info => label.dimmed().to_string(),
        }
    }

    fn write_header(&self, out: &mut String, response: &ScanResponse) -> std::fmt::Result {
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(out, "{}", rule)?;
        writeln!(out, "SCAN RESULTS")?;
        writeln!(out, "{}", rule)?;
        writeln!(out)?;
        writeln!(
            out,
            "Project: {}@{}",
            response.project.name, response.project.version
        )?;
        writeln!(
            out,
            "Lockfile: {} ({}, format version {})",
            response.project.lockfile_path.display(),
            response.project.lockfile_format,
            response.project.format_version
        )?;
        writeln!(
            out,
            "Blocklist: {} ({} entries)",
            response.blocklist_location, response.blocklist_size
        )?;
        writeln!(out)?;
        writeln!(
            out,
            "Total packages scanned: {} ({} direct, {} transitive, {} unreachable)",
            response.total_packages,
            response.direct_count,
            response.transitive_count,
            response.unreachable_count
        )?;
        writeln!(out, "Issues found: {}", response.findings.len())?;
        if response.ignored_count > 0 {
            writeln!(out, "Ignored by configuration: {}", response.ignored_count)?;
        }
        writeln!(out)
    }

    fn write_finding(&self, out: &mut String, index: usize, finding: &Finding) -> std::fmt::Result {
        writeln!(
            out,
            "{}. {}@{} [{}]",
            index,
            finding.package_name(),
            finding.version(),
            self.severity_label(finding.severity())
        )?;
        let dependency_type = if finding.is_direct() {
            "direct"
        } else {
            "transitive"
        };
        writeln!(out, "   Type: {} dependency", dependency_type)?;
        match finding.path() {
            Some(path) => writeln!(out, "   Path: {}", path.join(PATH_SEPARATOR))?,
            None => writeln!(
                out,
                "   Path: (not reachable from the project root: {})",
                finding.package_key()
            )?,
        }
        writeln!(out, "   Reason: {}", finding.reason())?;
        if let Some(cve) = finding.cve() {
            writeln!(out, "   CVE: {}", cve)?;
        }
        writeln!(out)
    }
}

impl Default for TableFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for TableFormatter {
    fn format(&self, response: &ScanResponse) -> Result<String> {
        let mut out = String::new();
        self.write_header(&mut out, response)?;

        if !response.has_findings() {
            writeln!(out, "✅ No compromised packages detected!")?;
            return Ok(out);
        }

        writeln!(out, "⚠️  SECURITY ISSUES DETECTED:")?;
        writeln!(out)?;
        for (i, finding) in response.findings.iter().enumerate() {
            self.write_finding(&mut out, i + 1, finding)?;
        }

        if response.has_findings_at_or_above_threshold {
            writeln!(
                out,
                "❌ Compromised packages at or above '{}' severity detected!",
                response.fail_on
            )?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::outbound::formatters::test_support::sample_response;

    #[test]
    fn test_table_lists_findings_with_path() {
        let output = TableFormatter::new().format(&sample_response()).unwrap();

        assert!(output.contains("SCAN RESULTS"));
        assert!(output.contains("Project: test-project@1.0.0"));
        assert!(output.contains("Issues found: 2"));
        assert!(output.contains("1. lodash@4.17.20 [CRITICAL]"));
        assert!(output.contains("   Type: direct dependency"));
        assert!(output.contains("   Path: test-project → lodash"));
        assert!(output.contains("   CVE: CVE-2020-8203"));
        assert!(output.contains("2. body-parser@1.20.1 [MEDIUM]"));
        assert!(output.contains("   Path: test-project → express → body-parser"));
        assert!(output.contains("Compromised packages at or above 'critical' severity"));
    }

    #[test]
    fn test_table_without_findings() {
        let mut response = sample_response();
        response.findings.clear();
        response.has_findings_at_or_above_threshold = false;

        let output = TableFormatter::new().format(&response).unwrap();
        assert!(output.contains("Issues found: 0"));
        assert!(output.contains("No compromised packages detected"));
        assert!(!output.contains("SECURITY ISSUES"));
    }

    #[test]
    fn test_table_plain_output_has_no_ansi_codes() {
        let output = TableFormatter::new().format(&sample_response()).unwrap();
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_table_colored_output() {
        let output = TableFormatter::with_colors(true)
            .format(&sample_response())
            .unwrap();
        assert!(output.contains('\u{1b}'));
    }

    #[test]
    fn test_table_reports_ignored_count() {
        let mut response = sample_response();
        response.ignored_count = 3;
        let output = TableFormatter::new().format(&response).unwrap();
        assert!(output.contains("Ignored by configuration: 3"));
    }
}
