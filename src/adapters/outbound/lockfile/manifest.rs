use crate::scanning::domain::Lockfile;
use crate::shared::error::ScanError;
use crate::shared::security::read_checked_to_string;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

const MANIFEST_FILE: &str = "package.json";

/// The parts of `package.json` the scanner cares about
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Manifest {
    pub name: String,
    pub version: String,
    pub dependencies: BTreeMap<String, String>,
}

impl Manifest {
    /// The project's direct dependencies: `dependencies` only, dev and
    /// optional sections are not direct.
    pub fn declared_dependencies(&self) -> BTreeMap<String, String> {
        self.dependencies.clone()
    }
}

/// Reads `package.json` from `project_dir`.
///
/// # Errors
/// Returns [`ScanError::ManifestUnavailable`] when the file is missing,
/// unreadable or not valid JSON.
pub fn read_manifest(project_dir: &Path) -> std::result::Result<Manifest, ScanError> {
    let path = project_dir.join(MANIFEST_FILE);
    let unavailable = |details: String| ScanError::ManifestUnavailable {
        path: path.clone(),
        details,
    };

    let content = read_checked_to_string(&path, MANIFEST_FILE).map_err(|e| unavailable(e.to_string()))?;
    serde_json::from_str(&content).map_err(|e| unavailable(e.to_string()))
}

/// Overlays project name, version and direct dependencies from `package.json`.
///
/// Never fails: when the manifest cannot be used the lockfile keeps its own
/// best-effort values.
pub fn enrich_from_manifest(lockfile: &mut Lockfile, project_dir: &Path) {
    match read_manifest(project_dir) {
        Ok(manifest) => {
            let declared = manifest.declared_dependencies();
            lockfile.apply_manifest(&manifest.name, &manifest.version, declared);
        }
        Err(e) => debug!(error = %e, "manifest enrichment skipped"),
    }
}
