use crate::scanning::domain::Blocklist;
use crate::shared::Result;

/// BlocklistRepository port for loading the list of compromised releases
///
/// Implementations may read a local CSV file, download one, or wrap another
/// repository with a disk cache.
pub trait BlocklistRepository {
    /// Loads the blocklist found at `location`
    ///
    /// # Arguments
    /// * `location` - URL or filesystem path of the blocklist CSV
    ///
    /// # Errors
    /// Returns an error if the source cannot be read or contains no usable rows
    fn fetch_blocklist(&self, location: &str) -> Result<Blocklist>;
}

impl<T: BlocklistRepository + ?Sized> BlocklistRepository for Box<T> {
    fn fetch_blocklist(&self, location: &str) -> Result<Blocklist> {
        (**self).fetch_blocklist(location)
    }
}

impl<T: BlocklistRepository + ?Sized> BlocklistRepository for &T {
    fn fetch_blocklist(&self, location: &str) -> Result<Blocklist> {
        (**self).fetch_blocklist(location)
    }
}
