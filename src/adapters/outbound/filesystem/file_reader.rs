use crate::adapters::outbound::csv::parse_blocklist_csv;
use crate::adapters::outbound::lockfile::{detect_lockfile, parse_lockfile, BunParser};
use crate::ports::outbound::{BlocklistRepository, LoadedLockfile, LockfileReader};
use crate::scanning::domain::Blocklist;
use crate::shared::error::ScanError;
use crate::shared::security::read_checked_to_string;
use crate::shared::Result;
use std::path::Path;
use tracing::debug;

/// FileSystemReader adapter for reading project files from disk
///
/// Implements both LockfileReader (detect and parse the project's lockfile)
/// and BlocklistRepository (load a local blocklist CSV).
pub struct FileSystemReader {
    bun: BunParser,
}

impl FileSystemReader {
    pub fn new() -> Self {
        Self::with_bun_parser(BunParser::new())
    }

    /// Uses a custom Bun parser, e.g. one pointing at another `bun` binary
    pub fn with_bun_parser(bun: BunParser) -> Self {
        Self { bun }
    }
}

impl Default for FileSystemReader {
    fn default() -> Self {
        Self::new()
    }
}

impl LockfileReader for FileSystemReader {
    fn read_lockfile(&self, project_path: &Path) -> Result<LoadedLockfile> {
        let (format, path) = detect_lockfile(project_path)?;
        debug!(format = %format, path = %path.display(), "lockfile detected");

        let lockfile = parse_lockfile(format, &path, &self.bun)?;
        debug!(
            packages = lockfile.packages().len(),
            direct = lockfile.direct_dependencies().len(),
            "lockfile parsed"
        );

        Ok(LoadedLockfile {
            format,
            path,
            lockfile,
        })
    }
}

impl BlocklistRepository for FileSystemReader {
    fn fetch_blocklist(&self, location: &str) -> Result<Blocklist> {
        let path = Path::new(location);
        let content = read_checked_to_string(path, "blocklist").map_err(|e| {
            ScanError::BlocklistLoad {
                location: location.to_string(),
                details: e.to_string(),
            }
        })?;
        parse_blocklist_csv(&content, location)
    }
}
