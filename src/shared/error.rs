use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// CI pipelines gate on these: `1` means the scan itself worked but found
/// compromised packages at or above the configured severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Scan completed, nothing at or above the fail threshold
    Success = 0,
    /// Compromised packages at or above the fail threshold were found
    CompromisedPackagesDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Lockfile, blocklist, network or file I/O failure
    ApplicationError = 3,
}

impl ExitCode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::CompromisedPackagesDetected => write!(f, "Compromised Packages Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Error taxonomy for lockfile scanning.
///
/// `LockfileNotFound`, `MalformedLockfile` and `ToolUnavailable` abort a scan.
/// `ManifestUnavailable` is only ever produced while enriching a lockfile from
/// `package.json` and is swallowed there.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("No supported lockfile found in {path}\n\n💡 Hint: {suggestion}")]
    LockfileNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse {format} lockfile: {path}\nDetails: {details}\n\n💡 Hint: Regenerate the lockfile with your package manager and try again")]
    MalformedLockfile {
        path: PathBuf,
        format: String,
        details: String,
    },

    #[error("'{tool}' is required to read this lockfile but could not be launched\nDetails: {details}\n\n💡 Hint: {hint}")]
    ToolUnavailable {
        tool: String,
        details: String,
        hint: String,
    },

    #[error("Project manifest could not be used: {path}\nDetails: {details}")]
    ManifestUnavailable { path: PathBuf, details: String },

    #[error("Failed to load blocklist: {location}\nDetails: {details}\n\n💡 Hint: Check the URL or file path, or pass --blocklist with a local CSV file")]
    BlocklistLoad { location: String, details: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Invalid project path: {path}\nReason: {reason}\n\n💡 Hint: Please specify a valid project directory")]
    InvalidProjectPath { path: PathBuf, reason: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}

impl ScanError {
    /// Whether this error must abort the scan.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, ScanError::ManifestUnavailable { .. })
    }
}
