/// Adapters layer - Infrastructure implementations
///
/// This layer contains concrete implementations of the outbound ports:
/// lockfile parsing, blocklist loading and caching, report rendering and
/// output.
pub mod outbound;
