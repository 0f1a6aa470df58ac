/// Crate-wide Result alias.
///
/// Adapters raise [`crate::shared::error::ScanError`] values and wrap them in
/// `anyhow::Error`; callers that need the category use `downcast_ref`.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
