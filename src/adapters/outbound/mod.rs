/// Outbound adapters - Infrastructure implementations of outbound ports
pub mod console;
pub mod csv;
pub mod filesystem;
pub mod formatters;
pub mod lockfile;
pub mod network;
