//! Lockfile adapters: format detection, one parser per package manager and
//! the `package.json` enrichment every parser ends with.
mod bun;
mod detector;
mod manifest;
mod npm;
mod pnpm;
mod yarn;

pub use bun::BunParser;
pub use detector::detect_lockfile;
pub use manifest::{enrich_from_manifest, read_manifest, Manifest};

use crate::scanning::domain::{Lockfile, LockfileFormat};
use crate::shared::error::ScanError;
use crate::shared::security::read_checked;
use crate::shared::Result;
use std::path::Path;

/// Parses the lockfile at `lockfile_path` as `format`, then enriches it from
/// the sibling `package.json`.
///
/// # Errors
/// Returns [`ScanError::MalformedLockfile`] when the file cannot be decoded
/// and [`ScanError::ToolUnavailable`] when a Bun lockfile is found but `bun`
/// cannot be launched. There is no fallback to another format.
pub fn parse_lockfile(format: LockfileFormat, lockfile_path: &Path, bun: &BunParser) -> Result<Lockfile> {
    let mut lockfile = match format {
        LockfileFormat::Npm => npm::parse(&read_lockfile_text(lockfile_path, format)?, lockfile_path)?,
        LockfileFormat::Yarn => yarn::parse(&read_lockfile_text(lockfile_path, format)?, lockfile_path)?,
        LockfileFormat::Pnpm => pnpm::parse(&read_lockfile_text(lockfile_path, format)?, lockfile_path)?,
        LockfileFormat::Bun => bun.parse(lockfile_path)?,
    };

    if let Some(project_dir) = lockfile_path.parent() {
        enrich_from_manifest(&mut lockfile, project_dir);
    }
    Ok(lockfile)
}

/// OS failures stay `FileReadError`; bytes that are not UTF-8 are a malformed lockfile.
fn read_lockfile_text(lockfile_path: &Path, format: LockfileFormat) -> Result<String> {
    let bytes = read_checked(lockfile_path, format.filename())?;
    String::from_utf8(bytes)
        .map_err(|e| malformed(lockfile_path, format, format!("not valid UTF-8: {}", e)))
}

pub(crate) fn malformed(lockfile_path: &Path, format: LockfileFormat, details: impl Into<String>) -> anyhow::Error {
    ScanError::MalformedLockfile {
        path: lockfile_path.to_path_buf(),
        format: format.display_name().to_string(),
        details: details.into(),
    }
    .into()
}

/// Name of the directory holding the lockfile, used until the manifest says otherwise.
pub(crate) fn default_project_name(lockfile_path: &Path) -> String {
    let dir = lockfile_path.parent().unwrap_or_else(|| Path::new("."));
    let dir = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
    dir.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_string())
}

/// Version reported for projects whose lockfile does not record one.
pub(crate) const UNKNOWN_VERSION: &str = "unknown";
