//! Scanning domain: canonical lockfile model, dependency graph and the pure
//! services that build, walk and scan it. Nothing in here performs I/O.
pub mod domain;
pub mod services;
