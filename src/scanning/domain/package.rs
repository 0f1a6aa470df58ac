use std::collections::BTreeMap;

/// Drops a pnpm peer-dependency suffix from a version.
///
/// `18.2.0_react@18.2.0` and `18.2.0(react@18.2.0)` both become `18.2.0`.
/// Neither `_` nor `(` can occur in a semver version, so plain versions are
/// returned unchanged.
pub fn strip_peer_suffix(version: &str) -> &str {
    match version.find(['_', '(']) {
        Some(end) if end > 0 => &version[..end],
        _ => version,
    }
}

/// A resolved package as recorded in a lockfile.
///
/// The same name may appear several times in one lockfile with different
/// versions, so a package is identified by its install-path key in
/// [`super::Lockfile`], never by its name alone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    version: String,
    resolved: Option<String>,
    integrity: Option<String>,
    dependencies: BTreeMap<String, String>,
}

impl Package {
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: version.into(),
            resolved: None,
            integrity: None,
            dependencies: BTreeMap::new(),
        }
    }

    /// Sets the tarball URL the package was resolved from. Empty values are ignored.
    pub fn with_resolved(mut self, resolved: impl Into<String>) -> Self {
        let resolved = resolved.into();
        if !resolved.is_empty() {
            self.resolved = Some(resolved);
        }
        self
    }

    /// Sets the subresource-integrity hash. Empty values are ignored.
    pub fn with_integrity(mut self, integrity: impl Into<String>) -> Self {
        let integrity = integrity.into();
        if !integrity.is_empty() {
            self.integrity = Some(integrity);
        }
        self
    }

    /// Records a declared dependency. A name declared twice keeps its first range.
    pub fn add_dependency(&mut self, name: impl Into<String>, range: impl Into<String>) {
        self.dependencies
            .entry(name.into())
            .or_insert_with(|| range.into());
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn resolved(&self) -> Option<&str> {
        self.resolved.as_deref()
    }

    pub fn integrity(&self) -> Option<&str> {
        self.integrity.as_deref()
    }

    /// Declared dependencies, name to version range.
    pub fn dependencies(&self) -> &BTreeMap<String, String> {
        &self.dependencies
    }
}
