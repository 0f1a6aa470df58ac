/// Integration tests for the application layer
mod test_utilities;

use std::path::{Path, PathBuf};
use test_utilities::mocks::*;
use hulud_scan::prelude::*;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn fixture_location(name: &str) -> String {
    fixture(name).display().to_string()
}

/// test-project -> lodash, express; express -> body-parser
fn sample_lockfile() -> Lockfile {
    let mut lockfile = Lockfile::new("test-project", "1.0.0", 3);
    lockfile.add_direct_dependency("lodash", "^4.17.0");
    lockfile.add_direct_dependency("express", "^4.18.2");
    lockfile.insert_package("node_modules/lodash", Package::new("lodash", "4.17.20"));
    let mut express = Package::new("express", "4.18.2");
    express.add_dependency("body-parser", "1.20.1");
    lockfile.insert_package("node_modules/express", express);
    lockfile.insert_package(
        "node_modules/body-parser",
        Package::new("body-parser", "1.20.1"),
    );
    lockfile
}

fn request(project: PathBuf, blocklist: &str, fail_on: Severity) -> ScanRequest {
    ScanRequest::new(project, blocklist, vec![], fail_on)
}

#[test]
fn test_scan_project_happy_path() {
    let blocklist_repository = MockBlocklistRepository::new()
        .with_entry(
            "lodash",
            "4.17.20",
            Severity::Critical,
            "Prototype pollution",
            Some("CVE-2020-8203"),
        )
        .with_entry("body-parser", "1.20.1", Severity::Medium, "test", None);
    let progress_reporter = MockProgressReporter::new();

    let use_case = ScanProjectUseCase::new(
        MockLockfileReader::new(sample_lockfile()),
        blocklist_repository.clone(),
        progress_reporter.clone(),
    );

    let response = use_case
        .execute(request(PathBuf::from("."), "blocklist.csv", Severity::Critical))
        .unwrap();

    assert_eq!(response.findings.len(), 2);
    assert_eq!(response.total_packages, 3);
    assert_eq!(response.blocklist_size, 2);
    assert!(response.has_findings_at_or_above_threshold);
    assert_eq!(blocklist_repository.call_count(), 1);
    assert_eq!(progress_reporter.progress_count(), 3);

    let messages = progress_reporter.get_messages();
    assert!(messages
        .last()
        .is_some_and(|m| m.starts_with("Completed:") && m.contains("2 issue(s)")));
}

#[test]
fn test_scan_project_clean() {
    let progress_reporter = MockProgressReporter::new();
    let use_case = ScanProjectUseCase::new(
        MockLockfileReader::new(sample_lockfile()).with_format(LockfileFormat::Yarn),
        MockBlocklistRepository::new().with_entry(
            "left-pad",
            "1.3.0",
            Severity::High,
            "unpublished",
            None,
        ),
        progress_reporter.clone(),
    );

    let response = use_case
        .execute(request(PathBuf::from("."), "blocklist.csv", Severity::Low))
        .unwrap();

    assert!(response.findings.is_empty());
    assert!(!response.has_findings_at_or_above_threshold);
    assert_eq!(response.project.lockfile_format, LockfileFormat::Yarn);
    assert!(response.project.lockfile_path.ends_with("yarn.lock"));
}

#[test]
fn test_scan_project_lockfile_failure() {
    let blocklist_repository = MockBlocklistRepository::new();
    let use_case = ScanProjectUseCase::new(
        MockLockfileReader::with_failure(),
        blocklist_repository.clone(),
        MockProgressReporter::new(),
    );

    let result = use_case.execute(request(PathBuf::from("."), "blocklist.csv", Severity::Critical));

    assert!(result.is_err());
    assert_eq!(blocklist_repository.call_count(), 0);
}

#[test]
fn test_scan_project_blocklist_failure() {
    let use_case = ScanProjectUseCase::new(
        MockLockfileReader::new(sample_lockfile()),
        MockBlocklistRepository::with_failure(),
        MockProgressReporter::new(),
    );

    let err = use_case
        .execute(request(PathBuf::from("."), "remote.csv", Severity::Critical))
        .unwrap_err();
    assert!(err.to_string().contains("Mock blocklist failure for remote.csv"));
}

#[test]
fn test_scan_project_ignore_by_name() {
    let use_case = ScanProjectUseCase::new(
        MockLockfileReader::new(sample_lockfile()),
        MockBlocklistRepository::new()
            .with_entry("lodash", "4.17.20", Severity::Critical, "bad", None)
            .with_entry("body-parser", "1.20.1", Severity::High, "bad", None),
        MockProgressReporter::new(),
    );

    let request = ScanRequest::new(
        PathBuf::from("."),
        "blocklist.csv",
        vec!["lodash".to_string()],
        Severity::High,
    );
    let response = use_case.execute(request).unwrap();

    assert_eq!(response.ignored_count, 1);
    assert_eq!(response.findings.len(), 1);
    assert_eq!(response.findings[0].package_name(), "body-parser");
    assert!(response.has_findings_at_or_above_threshold);
}

#[test]
fn test_npm_fixture_end_to_end() {
    let location = fixture_location("blocklist.csv");
    let use_case = ScanProjectUseCase::new(
        FileSystemReader::new(),
        FileSystemReader::new(),
        MockProgressReporter::new(),
    );

    let response = use_case
        .execute(request(fixture("npm-project"), &location, Severity::Critical))
        .unwrap();

    assert_eq!(response.project.name, "test-project");
    assert_eq!(response.project.version, "1.0.0");
    assert_eq!(response.project.lockfile_format, LockfileFormat::Npm);
    assert_eq!(response.project.format_version, 3);
    assert_eq!(response.total_packages, 6);
    assert_eq!(response.direct_count, 2);
    assert_eq!(response.transitive_count, 3);
    assert_eq!(response.unreachable_count, 1);
    assert_eq!(response.blocklist_size, 5);

    let summary: Vec<(&str, &str, Severity)> = response
        .findings
        .iter()
        .map(|f| (f.package_name(), f.version(), f.severity()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("lodash", "4.17.20", Severity::Critical),
            ("body-parser", "1.20.1", Severity::Medium),
            ("ms", "2.1.3", Severity::Low),
        ]
    );

    let lodash = &response.findings[0];
    assert!(lodash.is_direct());
    assert_eq!(lodash.cve(), Some("CVE-2020-8203"));
    assert_eq!(lodash.depth().value(), Some(1));

    let body_parser = &response.findings[1];
    assert!(!body_parser.is_direct());
    assert_eq!(
        body_parser.path(),
        Some(
            &[
                "test-project".to_string(),
                "express".to_string(),
                "body-parser".to_string()
            ][..]
        )
    );

    let shadowed_ms = &response.findings[2];
    assert_eq!(shadowed_ms.package_key(), "node_modules/express/node_modules/ms");
    assert!(!shadowed_ms.depth().is_reachable());
    assert!(shadowed_ms.path().is_none());

    assert!(response.has_findings_at_or_above_threshold);
}

#[test]
fn test_yarn_fixture_end_to_end() {
    let location = fixture_location("blocklist.csv");
    let use_case = ScanProjectUseCase::new(
        FileSystemReader::new(),
        FileSystemReader::new(),
        MockProgressReporter::new(),
    );

    let response = use_case
        .execute(request(fixture("yarn-project"), &location, Severity::High))
        .unwrap();

    assert_eq!(response.project.name, "yarn-app");
    assert_eq!(response.project.lockfile_format, LockfileFormat::Yarn);
    assert_eq!(response.total_packages, 5);
    assert_eq!(response.direct_count, 2);
    assert_eq!(response.findings.len(), 1);

    let finding = &response.findings[0];
    assert_eq!(finding.package_name(), "supports-color");
    assert_eq!(finding.version(), "5.5.0");
    assert_eq!(
        finding.path(),
        Some(
            &[
                "yarn-app".to_string(),
                "chalk".to_string(),
                "supports-color".to_string()
            ][..]
        )
    );
    assert!(response.has_findings_at_or_above_threshold);
}

#[test]
fn test_yarn_fixture_with_wiz_blocklist() {
    let location = fixture_location("wiz-blocklist.csv");
    let use_case = ScanProjectUseCase::new(
        FileSystemReader::new(),
        FileSystemReader::new(),
        MockProgressReporter::new(),
    );

    let response = use_case
        .execute(request(fixture("yarn-project"), &location, Severity::Critical))
        .unwrap();

    assert_eq!(response.blocklist_size, 3);
    assert_eq!(response.findings.len(), 1);
    assert_eq!(response.findings[0].package_name(), "color-convert");
    assert_eq!(response.findings[0].severity(), Severity::Critical);
    assert_eq!(response.findings[0].depth().value(), Some(3));
}

#[test]
fn test_pnpm_fixture_end_to_end() {
    let location = fixture_location("blocklist.csv");
    let use_case = ScanProjectUseCase::new(
        FileSystemReader::new(),
        FileSystemReader::new(),
        MockProgressReporter::new(),
    );

    let response = use_case
        .execute(request(fixture("pnpm-project"), &location, Severity::Critical))
        .unwrap();

    assert_eq!(response.project.name, "pnpm-app");
    assert_eq!(response.project.lockfile_format, LockfileFormat::Pnpm);
    assert_eq!(response.project.format_version, 5);
    assert_eq!(response.total_packages, 5);
    assert_eq!(response.direct_count, 2);
    assert_eq!(response.unreachable_count, 0);

    assert_eq!(response.findings.len(), 1);
    let scheduler = &response.findings[0];
    assert_eq!(scheduler.package_name(), "scheduler");
    assert_eq!(scheduler.severity(), Severity::High);
    assert_eq!(
        scheduler.path(),
        Some(
            &[
                "pnpm-app".to_string(),
                "react-dom".to_string(),
                "scheduler".to_string()
            ][..]
        )
    );
    // high is below the critical threshold
    assert!(!response.has_findings_at_or_above_threshold);
}

fn scan_pnpm_fixture_with(blocklist_csv: &str) -> ScanResponse {
    let dir = tempfile::TempDir::new().unwrap();
    let blocklist_path = dir.path().join("blocklist.csv");
    std::fs::write(
        &blocklist_path,
        format!("package_name,version,severity,reason,cve\n{}", blocklist_csv),
    )
    .unwrap();

    let use_case = ScanProjectUseCase::new(
        FileSystemReader::new(),
        FileSystemReader::new(),
        MockProgressReporter::new(),
    );
    use_case
        .execute(request(
            fixture("pnpm-project"),
            &blocklist_path.display().to_string(),
            Severity::Critical,
        ))
        .unwrap()
}

#[test]
fn test_pnpm_fixture_base_version_does_not_match_peer_suffixed_install() {
    let response = scan_pnpm_fixture_with("react-dom,18.2.0,critical,test,\n");

    assert!(response.findings.is_empty());
    assert!(!response.has_findings_at_or_above_threshold);
}

#[test]
fn test_pnpm_fixture_full_peer_suffixed_version_matches() {
    let response = scan_pnpm_fixture_with("react-dom,18.2.0_react@18.2.0,critical,test,\n");

    assert_eq!(response.findings.len(), 1);
    assert_eq!(response.findings[0].package_name(), "react-dom");
    assert!(response.findings[0].is_direct());
    assert!(response.has_findings_at_or_above_threshold);
}

#[test]
fn test_clean_fixture_has_no_findings() {
    let location = fixture_location("blocklist.csv");
    let use_case = ScanProjectUseCase::new(
        FileSystemReader::new(),
        FileSystemReader::new(),
        MockProgressReporter::new(),
    );

    let response = use_case
        .execute(request(fixture("clean-project"), &location, Severity::Info))
        .unwrap();

    assert_eq!(response.project.name, "clean-project");
    assert_eq!(response.total_packages, 1);
    assert!(response.findings.is_empty());
    assert!(!response.has_findings_at_or_above_threshold);
}

#[test]
fn test_project_without_lockfile() {
    let dir = tempfile::TempDir::new().unwrap();
    let use_case = ScanProjectUseCase::new(
        FileSystemReader::new(),
        MockBlocklistRepository::new(),
        MockProgressReporter::new(),
    );

    let err = use_case
        .execute(request(
            dir.path().to_path_buf(),
            "blocklist.csv",
            Severity::Critical,
        ))
        .unwrap_err();
    assert!(err.to_string().contains("No supported lockfile found"));
}

#[test]
fn test_formatters_render_fixture_scan() {
    let location = fixture_location("blocklist.csv");
    let use_case = ScanProjectUseCase::new(
        FileSystemReader::new(),
        FileSystemReader::new(),
        MockProgressReporter::new(),
    );
    let response = use_case
        .execute(request(fixture("npm-project"), &location, Severity::Critical))
        .unwrap();

    let table = TableFormatter::new().format(&response).unwrap();
    assert!(table.contains("Project: test-project@1.0.0"));
    assert!(table.contains("lodash@4.17.20 [CRITICAL]"));
    assert!(table.contains("test-project → express → body-parser"));

    let json = JsonFormatter::new().format(&response).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["summary"]["issues_found"], 3);
    assert_eq!(value["summary"]["unreachable_packages"], 1);
    assert_eq!(value["findings"][2]["depth"], serde_json::Value::Null);
}
