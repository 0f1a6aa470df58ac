use crate::adapters::outbound::filesystem::{CachingBlocklistRepository, FileSystemReader};
use crate::adapters::outbound::network::{is_remote_location, HttpBlocklistClient};
use crate::ports::outbound::BlocklistRepository;
use crate::shared::Result;
use std::path::PathBuf;
use std::time::Duration;

/// Disk cache settings for remote blocklists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheSettings {
    pub dir: PathBuf,
    pub ttl: Duration,
}

/// Factory for creating the blocklist repository for a location
pub struct BlocklistFactory;

impl BlocklistFactory {
    /// Creates a repository able to load `location`
    ///
    /// URLs get the HTTP client, wrapped in the disk cache unless `cache`
    /// is `None`. Anything else is read as a local file and never cached.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built.
    pub fn create(
        location: &str,
        cache: Option<CacheSettings>,
    ) -> Result<Box<dyn BlocklistRepository>> {
        if !is_remote_location(location) {
            return Ok(Box::new(FileSystemReader::new()));
        }

        let client = HttpBlocklistClient::new()?;
        Ok(match cache {
            Some(settings) => Box::new(CachingBlocklistRepository::with_ttl(
                client,
                settings.dir,
                settings.ttl,
            )),
            None => Box::new(client),
        })
    }
}
