use super::Package;
use std::collections::BTreeMap;
use std::fmt;

/// Prefix of every install-path key.
const NODE_MODULES_PREFIX: &str = "node_modules/";

/// Install-path key a package named `name` occupies at the top of `node_modules`.
pub fn node_modules_key(name: &str) -> String {
    format!("{}{}", NODE_MODULES_PREFIX, name)
}

/// Supported lockfile formats, a closed set checked in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockfileFormat {
    Npm,
    Yarn,
    Pnpm,
    Bun,
}

impl LockfileFormat {
    /// Detection priority: the first format whose lockfile exists wins.
    pub const ALL: [LockfileFormat; 4] = [
        LockfileFormat::Npm,
        LockfileFormat::Yarn,
        LockfileFormat::Pnpm,
        LockfileFormat::Bun,
    ];

    pub fn filename(self) -> &'static str {
        match self {
            LockfileFormat::Npm => "package-lock.json",
            LockfileFormat::Yarn => "yarn.lock",
            LockfileFormat::Pnpm => "pnpm-lock.yaml",
            LockfileFormat::Bun => "bun.lockb",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LockfileFormat::Npm => "npm",
            LockfileFormat::Yarn => "Yarn",
            LockfileFormat::Pnpm => "pnpm",
            LockfileFormat::Bun => "Bun",
        }
    }
}

impl fmt::Display for LockfileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Canonical, format-independent view of a lockfile.
///
/// Produced once per scan by a parser and treated as immutable afterwards.
/// `direct_dependencies` holds what the project itself declares and is kept
/// independent of `packages`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lockfile {
    project_name: String,
    project_version: String,
    format_version: i64,
    packages: BTreeMap<String, Package>,
    direct_dependencies: BTreeMap<String, String>,
}

impl Lockfile {
    pub fn new(
        project_name: impl Into<String>,
        project_version: impl Into<String>,
        format_version: i64,
    ) -> Self {
        Self {
            project_name: project_name.into(),
            project_version: project_version.into(),
            format_version,
            packages: BTreeMap::new(),
            direct_dependencies: BTreeMap::new(),
        }
    }

    /// Inserts a package under an explicit install-path key (npm).
    ///
    /// An existing entry under the same key is kept.
    pub fn insert_package(&mut self, key: impl Into<String>, package: Package) {
        self.packages.entry(key.into()).or_insert(package);
    }

    /// Registers a package from a flat lockfile format (Yarn, pnpm, Bun).
    ///
    /// The first version seen for a name owns `node_modules/<name>`; later
    /// versions of the same name go under `node_modules/<name>@<version>`.
    /// Returns the key the package was stored under, or `None` when that
    /// exact name and version was already registered.
    pub fn register(&mut self, package: Package) -> Option<String> {
        let primary = node_modules_key(package.name());
        let key = match self.packages.get(&primary) {
            None => primary,
            Some(existing) if existing.version() == package.version() => return None,
            Some(_) => format!("{}@{}", primary, package.version()),
        };
        if self.packages.contains_key(&key) {
            return None;
        }
        self.packages.insert(key.clone(), package);
        Some(key)
    }

    pub fn set_format_version(&mut self, format_version: i64) {
        self.format_version = format_version;
    }

    /// Declares a direct dependency. An already declared name keeps its range.
    pub fn add_direct_dependency(&mut self, name: impl Into<String>, range: impl Into<String>) {
        self.direct_dependencies
            .entry(name.into())
            .or_insert_with(|| range.into());
    }

    /// Overlays values read from the project manifest.
    ///
    /// Empty values leave the lockfile's own best-effort values in place.
    pub fn apply_manifest(
        &mut self,
        name: &str,
        version: &str,
        direct_dependencies: BTreeMap<String, String>,
    ) {
        if !name.is_empty() {
            self.project_name = name.to_string();
        }
        if !version.is_empty() {
            self.project_version = version.to_string();
        }
        if !direct_dependencies.is_empty() {
            self.direct_dependencies = direct_dependencies;
        }
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn project_version(&self) -> &str {
        &self.project_version
    }

    pub fn format_version(&self) -> i64 {
        self.format_version
    }

    pub fn packages(&self) -> &BTreeMap<String, Package> {
        &self.packages
    }

    pub fn direct_dependencies(&self) -> &BTreeMap<String, String> {
        &self.direct_dependencies
    }
}
