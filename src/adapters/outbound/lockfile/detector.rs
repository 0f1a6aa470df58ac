use crate::scanning::domain::LockfileFormat;
use crate::shared::error::ScanError;
use crate::shared::Result;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Finds the lockfile to scan in `project_dir`.
///
/// Formats are checked in [`LockfileFormat::ALL`] order and the first one
/// present wins, so a project with both `package-lock.json` and `yarn.lock`
/// is scanned as npm.
///
/// # Errors
/// Returns [`ScanError::LockfileNotFound`] when none of the supported files exist.
pub fn detect_lockfile(project_dir: &Path) -> Result<(LockfileFormat, PathBuf)> {
    for format in LockfileFormat::ALL {
        let candidate = project_dir.join(format.filename());
        if candidate.exists() {
            debug!(format = %format, path = %candidate.display(), "lockfile detected");
            return Ok((format, candidate));
        }
    }

    let expected: Vec<&str> = LockfileFormat::ALL.iter().map(|f| f.filename()).collect();
    Err(ScanError::LockfileNotFound {
        path: project_dir.to_path_buf(),
        suggestion: format!(
            "Looked for: {}.\n   Run your package manager's install command first, or pass the project directory as an argument.",
            expected.join(", ")
        ),
    }
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_detect_each_format() {
        for format in LockfileFormat::ALL {
            let temp_dir = TempDir::new().unwrap();
            fs::write(temp_dir.path().join(format.filename()), "").unwrap();

            let (detected, path) = detect_lockfile(temp_dir.path()).unwrap();
            assert_eq!(detected, format);
            assert_eq!(path, temp_dir.path().join(format.filename()));
        }
    }

    #[test]
    fn test_detect_priority_npm_over_yarn() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("yarn.lock"), "").unwrap();
        fs::write(temp_dir.path().join("package-lock.json"), "{}").unwrap();
        fs::write(temp_dir.path().join("bun.lockb"), "").unwrap();

        let (detected, _) = detect_lockfile(temp_dir.path()).unwrap();
        assert_eq!(detected, LockfileFormat::Npm);
    }

    #[test]
    fn test_detect_priority_pnpm_over_bun() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("bun.lockb"), "").unwrap();
        fs::write(temp_dir.path().join("pnpm-lock.yaml"), "").unwrap();

        let (detected, _) = detect_lockfile(temp_dir.path()).unwrap();
        assert_eq!(detected, LockfileFormat::Pnpm);
    }

    #[test]
    fn test_detect_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = detect_lockfile(temp_dir.path()).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::LockfileNotFound { .. })
        ));
        assert!(err.to_string().contains("pnpm-lock.yaml"));
    }
}
