/// Filesystem adapters for file I/O operations
mod blocklist_cache;
mod file_reader;
mod file_writer;

pub use blocklist_cache::{cache_file_name, CachingBlocklistRepository, DEFAULT_CACHE_TTL};
pub use file_reader::FileSystemReader;
pub use file_writer::{ReportFileWriter, StdoutPresenter};
