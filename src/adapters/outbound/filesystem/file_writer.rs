use crate::ports::outbound::OutputPresenter;
use crate::shared::error::ScanError;
use crate::shared::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// ReportFileWriter adapter writing the rendered report to a file
///
/// Refuses to follow a symlink at the output path and requires the parent
/// directory to exist already.
pub struct ReportFileWriter {
    output_path: PathBuf,
}

impl ReportFileWriter {
    pub fn new(output_path: PathBuf) -> Self {
        Self { output_path }
    }

    fn write_error(&self, details: impl Into<String>) -> anyhow::Error {
        ScanError::FileWriteError {
            path: self.output_path.clone(),
            details: details.into(),
        }
        .into()
    }

    fn check_parent_directory(&self) -> Result<()> {
        match self.output_path.parent() {
            Some(parent) if parent != Path::new("") && !parent.is_dir() => Err(self.write_error(
                format!("Parent directory does not exist: {}", parent.display()),
            )),
            _ => Ok(()),
        }
    }

    fn check_not_symlink(&self) -> Result<()> {
        // A missing file is fine; it is created below.
        let Ok(metadata) = fs::symlink_metadata(&self.output_path) else {
            return Ok(());
        };
        if metadata.is_symlink() {
            return Err(ScanError::SecurityError {
                path: self.output_path.clone(),
                reason: "Output path is a symbolic link".to_string(),
                hint: "Write the report to a regular file path".to_string(),
            }
            .into());
        }
        if metadata.is_dir() {
            return Err(self.write_error("Output path is a directory"));
        }
        Ok(())
    }
}

impl OutputPresenter for ReportFileWriter {
    fn present(&self, content: &str) -> Result<()> {
        self.check_parent_directory()?;
        self.check_not_symlink()?;

        fs::write(&self.output_path, content).map_err(|e| self.write_error(e.to_string()))?;
        debug!(path = %self.output_path.display(), bytes = content.len(), "report written");

        eprintln!("✅ Report written: {}", self.output_path.display());
        Ok(())
    }
}

/// StdoutPresenter adapter writing the report to stdout
pub struct StdoutPresenter;

impl StdoutPresenter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StdoutPresenter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPresenter for StdoutPresenter {
    fn present(&self, content: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|_| stdout.flush())
            .map_err(|e| anyhow::anyhow!("Failed to write report to stdout: {}", e))?;
        Ok(())
    }
}
