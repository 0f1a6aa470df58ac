use crate::shared::Result;

/// OutputPresenter port for the rendered scan report
///
/// Decides where the report ends up (stdout or a file); rendering is the
/// job of [`super::ReportFormatter`].
pub trait OutputPresenter {
    /// Writes the rendered report to its destination
    ///
    /// # Errors
    /// Returns an error if the destination rejects the write, e.g. a missing
    /// parent directory, a symlinked output path or a closed stdout.
    fn present(&self, content: &str) -> Result<()>;
}
