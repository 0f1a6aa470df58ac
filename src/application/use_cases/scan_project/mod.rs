use crate::application::dto::{ProjectSummary, ScanRequest, ScanResponse};
use crate::ports::outbound::{BlocklistRepository, LoadedLockfile, LockfileReader, ProgressReporter};
use crate::scanning::domain::{Blocklist, Finding, Graph};
use crate::scanning::services::{GraphBuilder, GraphScanner};
use crate::shared::Result;
use chrono::Utc;
use tracing::debug;

/// ScanProjectUseCase - Core use case for scanning a project
///
/// Detects and parses the lockfile, builds the dependency graph, loads the
/// blocklist and matches every package against it.
///
/// # Type Parameters
/// * `LR` - LockfileReader implementation
/// * `BR` - BlocklistRepository implementation
/// * `PR` - ProgressReporter implementation
pub struct ScanProjectUseCase<LR, BR, PR> {
    lockfile_reader: LR,
    blocklist_repository: BR,
    progress_reporter: PR,
}

impl<LR, BR, PR> ScanProjectUseCase<LR, BR, PR>
where
    LR: LockfileReader,
    BR: BlocklistRepository,
    PR: ProgressReporter,
{
    /// Creates a new ScanProjectUseCase with injected dependencies
    pub fn new(lockfile_reader: LR, blocklist_repository: BR, progress_reporter: PR) -> Self {
        Self {
            lockfile_reader,
            blocklist_repository,
            progress_reporter,
        }
    }

    /// Executes the scan
    ///
    /// The lockfile is read before the blocklist is fetched, so a project
    /// without a lockfile fails without touching the network.
    ///
    /// # Errors
    /// Returns the first fatal error from the lockfile reader or blocklist
    /// repository; no partial report is produced.
    pub fn execute(&self, request: ScanRequest) -> Result<ScanResponse> {
        let loaded = self.read_lockfile(&request)?;
        let graph = self.build_graph(&loaded);
        let blocklist = self.load_blocklist(&request)?;

        let findings = self.scan(&graph, &blocklist);
        let (findings, ignored_count) = Self::apply_ignore_list(findings, &request);

        let has_findings_at_or_above_threshold =
            findings.iter().any(|f| f.severity() >= request.fail_on);

        self.progress_reporter.report_completion(&format!(
            "✅ Scan complete: {} issue(s) found",
            findings.len()
        ));

        Ok(ScanResponse {
            project: ProjectSummary {
                name: loaded.lockfile.project_name().to_string(),
                version: loaded.lockfile.project_version().to_string(),
                lockfile_format: loaded.format,
                lockfile_path: loaded.path,
                format_version: loaded.lockfile.format_version(),
            },
            findings,
            ignored_count,
            total_packages: graph.len(),
            direct_count: graph.direct_count(),
            transitive_count: graph.transitive_count(),
            unreachable_count: graph.unreachable_count(),
            blocklist_location: request.blocklist_location,
            blocklist_size: blocklist.len(),
            fail_on: request.fail_on,
            has_findings_at_or_above_threshold,
            scanned_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    fn read_lockfile(&self, request: &ScanRequest) -> Result<LoadedLockfile> {
        self.progress_reporter.report(&format!(
            "🔍 Scanning project at: {}",
            request.project_path.display()
        ));

        let loaded = self.lockfile_reader.read_lockfile(&request.project_path)?;

        self.progress_reporter.report(&format!(
            "📄 Parsed {} lockfile: {}",
            loaded.format,
            loaded.path.display()
        ));
        self.progress_reporter.report(&format!(
            "✅ Found {} package(s) in {}@{}",
            loaded.lockfile.packages().len(),
            loaded.lockfile.project_name(),
            loaded.lockfile.project_version()
        ));
        Ok(loaded)
    }

    fn build_graph(&self, loaded: &LoadedLockfile) -> Graph {
        self.progress_reporter.report("📊 Building dependency graph...");
        let graph = GraphBuilder::build(&loaded.lockfile);
        debug!(
            nodes = graph.len(),
            direct = graph.direct_count(),
            unreachable = graph.unreachable_count(),
            "dependency graph built"
        );
        graph
    }

    fn load_blocklist(&self, request: &ScanRequest) -> Result<Blocklist> {
        self.progress_reporter.report(&format!(
            "📋 Loading blocklist from: {}",
            request.blocklist_location
        ));

        let blocklist = self
            .blocklist_repository
            .fetch_blocklist(&request.blocklist_location)?;
        if blocklist.is_empty() {
            self.progress_reporter
                .report_warning("Blocklist contains no usable entries; nothing can be flagged");
        }

        self.progress_reporter.report(&format!(
            "✅ Loaded {} blocklist entries",
            blocklist.len()
        ));
        Ok(blocklist)
    }

    fn scan(&self, graph: &Graph, blocklist: &Blocklist) -> Vec<Finding> {
        self.progress_reporter
            .report("🔍 Scanning for compromised packages...");
        GraphScanner::scan_with_progress(graph, blocklist, |scanned, total| {
            self.progress_reporter.report_progress(scanned, total)
        })
    }

    /// Splits off findings matched by the request's ignore patterns.
    fn apply_ignore_list(findings: Vec<Finding>, request: &ScanRequest) -> (Vec<Finding>, usize) {
        if request.ignore_packages.is_empty() {
            return (findings, 0);
        }
        let before = findings.len();
        let kept: Vec<Finding> = findings
            .into_iter()
            .filter(|f| !request.is_ignored(f.package_name(), f.version()))
            .collect();
        let ignored = before - kept.len();
        if ignored > 0 {
            debug!(ignored, "findings suppressed by ignore list");
        }
        (kept, ignored)
    }
}
