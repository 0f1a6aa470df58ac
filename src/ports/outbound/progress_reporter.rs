/// ProgressReporter port for user-facing status while a scan runs
///
/// Implementations write somewhere other than stdout, which is reserved for
/// the report itself.
pub trait ProgressReporter {
    /// Reports a status line, e.g. which lockfile was detected
    fn report(&self, message: &str);

    /// Advances the per-package scan indicator
    ///
    /// # Arguments
    /// * `scanned` - Packages matched against the blocklist so far
    /// * `total` - Packages in the dependency graph
    fn report_progress(&self, scanned: usize, total: usize);

    /// Reports a non-fatal problem the user should know about
    fn report_warning(&self, message: &str);

    /// Reports that the scan finished, clearing any progress indicator
    fn report_completion(&self, message: &str);
}
