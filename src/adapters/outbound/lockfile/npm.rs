use super::{default_project_name, malformed, UNKNOWN_VERSION};
use crate::scanning::domain::{Lockfile, LockfileFormat, Package};
use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const NODE_MODULES_SEGMENT: &str = "node_modules/";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNpmLockfile {
    #[serde(default)]
    name: String,
    #[serde(default)]
    version: String,
    #[serde(default)]
    lockfile_version: i64,
    /// v2/v3: flat map keyed by install path
    #[serde(default)]
    packages: Option<BTreeMap<String, RawPackageEntry>>,
    /// v1: nested tree keyed by name
    #[serde(default)]
    dependencies: Option<BTreeMap<String, RawTreeEntry>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawPackageEntry {
    name: String,
    version: String,
    resolved: String,
    integrity: String,
    link: bool,
    dependencies: BTreeMap<String, String>,
    optional_dependencies: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawTreeEntry {
    version: String,
    resolved: String,
    integrity: String,
    requires: BTreeMap<String, String>,
    dependencies: BTreeMap<String, RawTreeEntry>,
}

/// Parses `package-lock.json` (lockfile versions 1, 2 and 3).
///
/// Versions 2 and 3 carry a `packages` map keyed by install path; the
/// empty-string key is the project itself and supplies the direct
/// dependencies. Version 1 only has the nested `dependencies` tree, which is
/// flattened into the same install-path keys.
pub(super) fn parse(content: &str, lockfile_path: &Path) -> Result<Lockfile> {
    let raw: RawNpmLockfile = serde_json::from_str(content)
        .map_err(|e| malformed(lockfile_path, LockfileFormat::Npm, e.to_string()))?;

    let root_entry = raw.packages.as_ref().and_then(|packages| packages.get(""));
    let project_name = first_non_empty(&[
        raw.name.as_str(),
        root_entry.map(|e| e.name.as_str()).unwrap_or_default(),
    ])
    .unwrap_or_else(|| default_project_name(lockfile_path));
    let project_version = first_non_empty(&[
        raw.version.as_str(),
        root_entry.map(|e| e.version.as_str()).unwrap_or_default(),
    ])
    .unwrap_or_else(|| UNKNOWN_VERSION.to_string());

    let mut lockfile = Lockfile::new(project_name, project_version, raw.lockfile_version);

    match (raw.packages, raw.dependencies) {
        (Some(packages), _) => read_packages_map(&mut lockfile, packages),
        (None, Some(tree)) => flatten_tree(&mut lockfile, "", tree),
        (None, None) => debug!("package-lock.json has neither packages nor dependencies"),
    }

    Ok(lockfile)
}

fn read_packages_map(lockfile: &mut Lockfile, packages: BTreeMap<String, RawPackageEntry>) {
    for (path, entry) in packages {
        if path.is_empty() {
            // devDependencies and optionalDependencies of the root are not direct
            for (name, range) in entry.dependencies {
                lockfile.add_direct_dependency(name, range);
            }
            continue;
        }
        if entry.link {
            debug!(path = %path, "skipping workspace link");
            continue;
        }
        let Some(name) = package_name_from_path(&path) else {
            debug!(path = %path, "skipping entry outside node_modules");
            continue;
        };

        let mut package = Package::new(name, entry.version)
            .with_resolved(entry.resolved)
            .with_integrity(entry.integrity);
        for (dep, range) in entry
            .dependencies
            .into_iter()
            .chain(entry.optional_dependencies)
        {
            package.add_dependency(dep, range);
        }
        lockfile.insert_package(path, package);
    }
}

/// Flattens a v1 `dependencies` tree. A nested entry `b` under `a` becomes
/// `node_modules/a/node_modules/b`.
fn flatten_tree(lockfile: &mut Lockfile, prefix: &str, tree: BTreeMap<String, RawTreeEntry>) {
    for (name, entry) in tree {
        let path = format!("{}{}{}", prefix, NODE_MODULES_SEGMENT, name);
        let mut package = Package::new(name, entry.version)
            .with_resolved(entry.resolved)
            .with_integrity(entry.integrity);
        for (dep, range) in entry.requires {
            package.add_dependency(dep, range);
        }
        lockfile.insert_package(path.clone(), package);

        if !entry.dependencies.is_empty() {
            flatten_tree(lockfile, &format!("{}/", path), entry.dependencies);
        }
    }
}

/// Derives the package name from an install path.
///
/// The segment after the LAST `node_modules/` names the package, scope
/// included: `node_modules/express/node_modules/body-parser` is
/// `body-parser` and `node_modules/@babel/core` is `@babel/core`.
fn package_name_from_path(path: &str) -> Option<String> {
    let start = path.rfind(NODE_MODULES_SEGMENT)? + NODE_MODULES_SEGMENT.len();
    let rest = &path[start..];

    let mut segments = rest.split('/');
    let first = segments.next().filter(|s| !s.is_empty())?;
    if first.starts_with('@') {
        let second = segments.next().filter(|s| !s.is_empty())?;
        Some(format!("{}/{}", first, second))
    } else {
        Some(first.to_string())
    }
}

fn first_non_empty(candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find(|c| !c.is_empty())
        .map(|c| c.to_string())
}
