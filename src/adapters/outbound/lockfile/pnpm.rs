use super::{default_project_name, malformed, UNKNOWN_VERSION};
use crate::scanning::domain::package::strip_peer_suffix;
use crate::scanning::domain::{Lockfile, LockfileFormat, Package};
use crate::shared::Result;
use serde_yaml_ng::Value;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Dependency sections merged into one map, earlier sections winning.
const DEPENDENCY_SECTIONS: [&str; 3] = ["dependencies", "optionalDependencies", "devDependencies"];

/// Parses `pnpm-lock.yaml`.
///
/// Package keys come in three shapes depending on the lockfile version:
/// `/name/version` (v5), `/name@version` (v6) and `name@version` (v9), each
/// optionally scoped and optionally carrying a peer suffix such as
/// `_react@18.2.0` or `(react@18.2.0)`. The suffix stays part of the version.
/// In v9 lockfiles the edges live under `snapshots` and are merged back onto
/// their package.
pub(super) fn parse(content: &str, lockfile_path: &Path) -> Result<Lockfile> {
    let document: Value = serde_yaml_ng::from_str(content)
        .map_err(|e| malformed(lockfile_path, LockfileFormat::Pnpm, e.to_string()))?;
    if !document.is_mapping() && !document.is_null() {
        return Err(malformed(
            lockfile_path,
            LockfileFormat::Pnpm,
            "top level is not a mapping",
        ));
    }

    let mut lockfile = Lockfile::new(
        default_project_name(lockfile_path),
        UNKNOWN_VERSION,
        normalize_lockfile_version(document.get("lockfileVersion")),
    );
    read_direct_dependencies(&document, &mut lockfile);

    let snapshot_edges = read_snapshot_edges(&document);
    let Some(packages) = document.get("packages").and_then(Value::as_mapping) else {
        return Ok(lockfile);
    };

    for (key, entry) in packages {
        let Some(key) = key.as_str() else {
            continue;
        };
        let Some((name, version)) = split_package_key(key) else {
            debug!(key = %key, "skipping unrecognised pnpm package key");
            continue;
        };

        let resolution = entry.get("resolution");
        let mut package = Package::new(name.clone(), version.clone())
            .with_integrity(string_field(resolution, "integrity"))
            .with_resolved(string_field(resolution, "tarball"));
        for (dep, range) in dependency_entries(entry) {
            package.add_dependency(dep, range);
        }
        if let Some(edges) = snapshot_edges.get(&(name, strip_peer_suffix(&version).to_string())) {
            for (dep, range) in edges {
                package.add_dependency(dep.clone(), range.clone());
            }
        }
        lockfile.register(package);
    }

    Ok(lockfile)
}

/// Splits a package key into name and version.
///
/// `/react-dom/18.2.0_react@18.2.0` is `react-dom` at `18.2.0_react@18.2.0`
/// and `@babel/core@7.20.0` is `@babel/core` at `7.20.0`.
pub(super) fn split_package_key(key: &str) -> Option<(String, String)> {
    let trimmed = key.strip_prefix('/').unwrap_or(key);
    let scope_len = if trimmed.starts_with('@') {
        trimmed.find('/')? + 1
    } else {
        0
    };
    let rest = &trimmed[scope_len..];
    let separator = rest.find(['/', '@'])?;
    let version = &rest[separator + 1..];
    if separator == 0 || version.is_empty() {
        return None;
    }
    Some((trimmed[..scope_len + separator].to_string(), version.to_string()))
}

/// Normalizes `lockfileVersion` to an integer.
///
/// Integers pass through, floats are truncated and strings contribute their
/// leading integer (`"6.0"` is 6). Anything else is 0.
pub(super) fn normalize_lockfile_version(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(number)) => number
            .as_i64()
            .or_else(|| number.as_f64().map(|f| f.trunc() as i64))
            .unwrap_or(0),
        Some(Value::String(text)) => leading_integer(text).unwrap_or(0),
        _ => 0,
    }
}

fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse::<i64>().ok().map(|n| sign * n)
}

/// Direct dependencies from the `dependencies` of `importers["."]` (v6+
/// workspaces) or the top level (v5 and single-project v6).
fn read_direct_dependencies(document: &Value, lockfile: &mut Lockfile) {
    let source = document
        .get("importers")
        .and_then(|importers| importers.get("."))
        .unwrap_or(document);
    for (name, range) in section_entries(source, "dependencies") {
        lockfile.add_direct_dependency(name, range);
    }
}

/// v9 `snapshots` edges keyed by `(name, version without peer suffix)`.
fn read_snapshot_edges(document: &Value) -> HashMap<(String, String), Vec<(String, String)>> {
    let mut edges: HashMap<(String, String), Vec<(String, String)>> = HashMap::new();
    let Some(snapshots) = document.get("snapshots").and_then(Value::as_mapping) else {
        return edges;
    };
    for (key, entry) in snapshots {
        let Some((name, version)) = key.as_str().and_then(split_package_key) else {
            continue;
        };
        edges
            .entry((name, strip_peer_suffix(&version).to_string()))
            .or_default()
            .extend(dependency_entries(entry));
    }
    edges
}

/// All `(name, range)` pairs of a node's dependency sections.
fn dependency_entries(node: &Value) -> Vec<(String, String)> {
    DEPENDENCY_SECTIONS
        .iter()
        .flat_map(|section| section_entries(node, section))
        .collect()
}

fn section_entries(node: &Value, section: &str) -> Vec<(String, String)> {
    let Some(mapping) = node.get(section).and_then(Value::as_mapping) else {
        return Vec::new();
    };
    mapping
        .iter()
        .filter_map(|(name, spec)| Some((name.as_str()?.to_string(), dependency_range(spec)?)))
        .collect()
}

/// A dependency value is either a plain version or, in v6+ importers, a
/// `{specifier, version}` mapping.
fn dependency_range(spec: &Value) -> Option<String> {
    match spec {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Mapping(_) => spec
            .get("specifier")
            .or_else(|| spec.get("version"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn string_field(node: Option<&Value>, field: &str) -> String {
    node.and_then(|n| n.get(field))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}
