//! Blocklist CSV codec
//!
//! Reads the two blocklist shapes in circulation (the Wiz `Package,Version`
//! export and the five-column `package_name,version,severity,reason,cve`
//! form) and writes the five-column form back out for the disk cache.

mod blocklist_csv;

pub use blocklist_csv::{parse_blocklist_csv, write_blocklist_csv};
