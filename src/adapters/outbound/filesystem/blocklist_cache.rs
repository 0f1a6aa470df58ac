use crate::adapters::outbound::csv::{parse_blocklist_csv, write_blocklist_csv};
use crate::ports::outbound::BlocklistRepository;
use crate::scanning::domain::Blocklist;
use crate::shared::security::read_checked_to_string;
use crate::shared::Result;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Default time a cached blocklist is served without refetching
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60 * 60);

/// CachingBlocklistRepository wraps a BlocklistRepository with an on-disk cache.
///
/// Each location is cached as `blocklist-<hash>.csv` in `cache_dir`, where the
/// hash is the first 8 bytes of the SHA-256 of the location in hex. A cache
/// file younger than the TTL is served without calling the inner repository.
/// When the inner repository fails, an expired cache file is served instead.
/// Empty blocklists are never written to the cache.
pub struct CachingBlocklistRepository<R: BlocklistRepository> {
    inner: R,
    cache_dir: PathBuf,
    ttl: Duration,
}

impl<R: BlocklistRepository> CachingBlocklistRepository<R> {
    pub fn new(inner: R, cache_dir: PathBuf) -> Self {
        Self::with_ttl(inner, cache_dir, DEFAULT_CACHE_TTL)
    }

    pub fn with_ttl(inner: R, cache_dir: PathBuf, ttl: Duration) -> Self {
        Self {
            inner,
            cache_dir,
            ttl,
        }
    }

    /// Path of the cache file for `location`
    pub fn cache_path(&self, location: &str) -> PathBuf {
        self.cache_dir.join(cache_file_name(location))
    }

    fn is_fresh(&self, path: &Path) -> bool {
        let modified = fs::metadata(path).and_then(|m| m.modified());
        match modified {
            Ok(modified) => SystemTime::now()
                .duration_since(modified)
                .map(|age| age <= self.ttl)
                // Modified in the future: treat as fresh
                .unwrap_or(true),
            Err(_) => false,
        }
    }

    fn load(&self, path: &Path) -> Result<Blocklist> {
        let content = read_checked_to_string(path, "cached blocklist")?;
        parse_blocklist_csv(&content, &path.display().to_string())
    }

    fn store(&self, path: &Path, blocklist: &Blocklist) -> Result<()> {
        fs::create_dir_all(&self.cache_dir)?;
        fs::write(path, write_blocklist_csv(blocklist)?)?;
        Ok(())
    }
}

impl<R: BlocklistRepository> BlocklistRepository for CachingBlocklistRepository<R> {
    fn fetch_blocklist(&self, location: &str) -> Result<Blocklist> {
        let path = self.cache_path(location);

        if self.is_fresh(&path) {
            match self.load(&path) {
                Ok(blocklist) => {
                    debug!(cache = %path.display(), "using cached blocklist");
                    return Ok(blocklist);
                }
                Err(e) => debug!(cache = %path.display(), error = %e, "unreadable cache entry"),
            }
        } else {
            debug!(cache = %path.display(), "blocklist cache miss");
        }

        match self.inner.fetch_blocklist(location) {
            Ok(blocklist) if blocklist.is_empty() => {
                debug!(location, "empty blocklist not cached");
                Ok(blocklist)
            }
            Ok(blocklist) => {
                if let Err(e) = self.store(&path, &blocklist) {
                    warn!(cache = %path.display(), error = %e, "failed to cache blocklist");
                }
                Ok(blocklist)
            }
            Err(fetch_error) => match self.load(&path) {
                Ok(stale) => {
                    warn!(
                        location,
                        error = %fetch_error,
                        "download failed, using cached blocklist (may be outdated)"
                    );
                    Ok(stale)
                }
                Err(_) => Err(fetch_error),
            },
        }
    }
}

/// `blocklist-<first 8 bytes of sha256(location) in hex>.csv`
pub fn cache_file_name(location: &str) -> String {
    let digest = Sha256::digest(location.as_bytes());
    let hex: String = digest[..8].iter().map(|b| format!("{:02x}", b)).collect();
    format!("blocklist-{}.csv", hex)
}
