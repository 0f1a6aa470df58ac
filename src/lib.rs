//! hulud-scan - supply-chain scanner for JavaScript/TypeScript lockfiles
//!
//! Reads a project's npm, Yarn, pnpm or Bun lockfile, rebuilds the
//! dependency graph and reports every installed package version that
//! appears on a blocklist of compromised releases, together with the chain
//! of dependencies that pulled it in.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`scanning`): Lockfile model, dependency graph, blocklist matching
//! - **Application Layer** (`application`): Use cases, DTOs and adapter factories
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Lockfile parsers, blocklist sources, formatters
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use hulud_scan::prelude::*;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<()> {
//! let use_case = ScanProjectUseCase::new(
//!     FileSystemReader::new(),
//!     FileSystemReader::new(),
//!     StderrProgressReporter::new(),
//! );
//!
//! let request = ScanRequest::new(
//!     PathBuf::from("."),
//!     "blocklist.csv",
//!     vec![],
//!     Severity::Critical,
//! );
//! let response = use_case.execute(request)?;
//!
//! let output = TableFormatter::new().format(&response)?;
//! StdoutPresenter::new().present(&output)?;
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod config;
pub mod ports;
pub mod scanning;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        CachingBlocklistRepository, FileSystemReader, ReportFileWriter, StdoutPresenter,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, TableFormatter};
    pub use crate::adapters::outbound::network::HttpBlocklistClient;
    pub use crate::application::dto::{OutputFormat, ScanRequest, ScanResponse};
    pub use crate::application::use_cases::ScanProjectUseCase;
    pub use crate::ports::outbound::{
        BlocklistRepository, LoadedLockfile, LockfileReader, OutputPresenter, ProgressReporter,
        ReportFormatter,
    };
    pub use crate::scanning::domain::{
        Blocklist, BlocklistEntry, Depth, Finding, Graph, Lockfile, LockfileFormat, Node, Package,
        Severity,
    };
    pub use crate::scanning::services::{GraphBuilder, GraphScanner, PathResolver};
    pub use crate::shared::Result;
}
