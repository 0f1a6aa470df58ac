//! Configuration file support for hulud-scan.
//!
//! Provides YAML-based configuration through `hulud-scan.config.yml` files
//! placed in the scanned project, or passed explicitly with `--config`.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

use crate::scanning::domain::Severity;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "hulud-scan.config.yml";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub format: Option<String>,
    pub blocklist: Option<String>,
    pub cache_dir: Option<String>,
    pub no_cache: Option<bool>,
    pub cache_ttl_secs: Option<u64>,
    pub fail_on: Option<String>,
    /// `name` or `name@version` entries left out of the findings
    pub ignore_packages: Option<Vec<String>>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: BTreeMap<String, serde_yaml_ng::Value>,
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    // An empty file deserializes to YAML null
    if content.trim().is_empty() {
        return Ok(ConfigFile::default());
    }

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.is_file() {
        return Ok(None);
    }

    load_config_from_path(&config_path).map(Some)
}

fn validate_config(config: &ConfigFile) -> Result<()> {
    if let Some(ref fail_on) = config.fail_on {
        if let Err(e) = fail_on.parse::<Severity>() {
            bail!("Invalid config: fail_on: {}", e);
        }
    }

    if let Some(ref ignore_packages) = config.ignore_packages {
        for (i, entry) in ignore_packages.iter().enumerate() {
            if entry.trim().is_empty() {
                bail!(
                    "Invalid config: ignore_packages[{}] must not be empty.\n\n\
                     💡 Hint: Use a package name (\"lodash\") or name@version (\"lodash@4.17.20\").",
                    i
                );
            }
        }
    }

    if config.cache_ttl_secs == Some(0) {
        bail!(
            "Invalid config: cache_ttl_secs must be greater than 0.\n\n\
             💡 Hint: Use no_cache: true to disable the blocklist cache."
        );
    }
    Ok(())
}

fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}
