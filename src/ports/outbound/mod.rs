/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (file system, network, console, etc.).
pub mod blocklist_repository;
pub mod formatter;
pub mod lockfile_reader;
pub mod output_presenter;
pub mod progress_reporter;

pub use blocklist_repository::BlocklistRepository;
pub use formatter::ReportFormatter;
pub use lockfile_reader::{LoadedLockfile, LockfileReader};
pub use output_presenter::OutputPresenter;
pub use progress_reporter::ProgressReporter;
