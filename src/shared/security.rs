use crate::shared::error::ScanError;
use crate::shared::Result;
use std::fs;
use std::path::Path;

/// Largest lockfile, manifest or blocklist we are willing to read (100 MB)
pub const MAX_FILE_SIZE: u64 = 100 * 1024 * 1024;

/// Reads a file after rejecting symlinks, non-regular files and oversized input.
///
/// `symlink_metadata` is used so a symlink is inspected itself rather than
/// its target.
///
/// # Errors
/// Returns [`ScanError::SecurityError`] for symlinks and oversized files and
/// [`ScanError::FileReadError`] for anything the OS refuses.
pub fn read_checked(path: &Path, file_description: &str) -> Result<Vec<u8>> {
    let metadata = fs::symlink_metadata(path).map_err(|e| ScanError::FileReadError {
        path: path.to_path_buf(),
        details: format!("Failed to read {} metadata: {}", file_description, e),
    })?;

    if metadata.is_symlink() {
        return Err(ScanError::SecurityError {
            path: path.to_path_buf(),
            reason: format!("{} is a symbolic link", file_description),
            hint: "Point the scanner at the real file instead of a symbolic link".to_string(),
        }
        .into());
    }

    if !metadata.is_file() {
        return Err(ScanError::FileReadError {
            path: path.to_path_buf(),
            details: format!("{} is not a regular file", file_description),
        }
        .into());
    }

    validate_file_size(metadata.len(), path, MAX_FILE_SIZE)?;

    fs::read(path).map_err(|e| {
        ScanError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        }
        .into()
    })
}

/// Same as [`read_checked`] but requires UTF-8 content.
pub fn read_checked_to_string(path: &Path, file_description: &str) -> Result<String> {
    let bytes = read_checked(path, file_description)?;
    String::from_utf8(bytes).map_err(|e| {
        ScanError::FileReadError {
            path: path.to_path_buf(),
            details: format!("{} is not valid UTF-8: {}", file_description, e),
        }
        .into()
    })
}

/// Rejects files larger than `max_size`.
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        return Err(ScanError::SecurityError {
            path: path.to_path_buf(),
            reason: format!(
                "File is too large ({} bytes). Maximum allowed size is {} bytes.",
                file_size, max_size
            ),
            hint: "Lockfiles and blocklists of this size are not supported".to_string(),
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    #[test]
    fn test_read_checked_regular_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("yarn.lock");
        fs::write(&file_path, "# yarn lockfile v1\n").unwrap();

        let bytes = read_checked(&file_path, "yarn.lock").unwrap();
        assert_eq!(bytes, b"# yarn lockfile v1\n");
    }

    #[test]
    fn test_read_checked_missing_file() {
        let path = PathBuf::from("/nonexistent/package-lock.json");
        let err = read_checked(&path, "package-lock.json").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::FileReadError { .. })
        ));
    }

    #[test]
    fn test_read_checked_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = read_checked(temp_dir.path(), "lockfile").unwrap_err();
        assert!(err.to_string().contains("not a regular file"));
    }

    #[cfg(unix)]
    #[test]
    fn test_read_checked_rejects_symlink() {
        let temp_dir = TempDir::new().unwrap();
        let target = temp_dir.path().join("real.json");
        let link = temp_dir.path().join("package-lock.json");
        fs::write(&target, "{}").unwrap();
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let err = read_checked(&link, "package-lock.json").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScanError>(),
            Some(ScanError::SecurityError { .. })
        ));
    }

    #[test]
    fn test_read_checked_to_string_rejects_invalid_utf8() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("blocklist.csv");
        fs::write(&file_path, [0xff, 0xfe, 0x00]).unwrap();

        let err = read_checked_to_string(&file_path, "blocklist").unwrap_err();
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[test]
    fn test_validate_file_size_exceeds_limit() {
        let path = PathBuf::from("/test/file.txt");
        let result = validate_file_size(MAX_FILE_SIZE + 1, &path, MAX_FILE_SIZE);
        assert!(result.unwrap_err().to_string().contains("too large"));
    }
}
