use crate::application::dto::ScanResponse;
use crate::shared::Result;

/// ReportFormatter port for rendering scan results
///
/// This port abstracts the output format (terminal table, JSON, etc.).
pub trait ReportFormatter {
    /// Renders a scan response
    ///
    /// # Arguments
    /// * `response` - Result of a completed scan
    ///
    /// # Returns
    /// Formatted report content as a string
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format(&self, response: &ScanResponse) -> Result<String>;
}
