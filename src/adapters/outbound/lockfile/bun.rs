use super::{default_project_name, malformed, UNKNOWN_VERSION};
use crate::scanning::domain::{Lockfile, LockfileFormat, Package};
use crate::shared::error::ScanError;
use crate::shared::Result;
use std::path::Path;
use std::process::Command;
use tracing::debug;

const DEFAULT_PROGRAM: &str = "bun";

/// Bun lockfiles do not carry a readable version.
const BUN_FORMAT_VERSION: i64 = 1;

/// Characters `bun pm ls` draws its tree with.
const TREE_CHARS: &[char] = &[' ', '├', '─', '└', '│'];

/// Reads `bun.lockb` through the `bun` CLI.
///
/// The binary lockfile is not decoded directly; `bun pm ls --all` is run in
/// the project directory and its listing parsed instead. The listing has no
/// edges and no direct/transitive marking, so Bun graphs are flat.
#[derive(Debug, Clone)]
pub struct BunParser {
    program: String,
}

impl BunParser {
    pub fn new() -> Self {
        Self::with_program(DEFAULT_PROGRAM)
    }

    /// Uses another executable in place of `bun`
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// # Errors
    /// Returns [`ScanError::ToolUnavailable`] when the program cannot be
    /// launched and [`ScanError::MalformedLockfile`] when it runs but fails.
    pub fn parse(&self, lockfile_path: &Path) -> Result<Lockfile> {
        let project_dir = lockfile_path.parent().unwrap_or_else(|| Path::new("."));
        debug!(program = %self.program, dir = %project_dir.display(), "running bun pm ls --all");
        let output = Command::new(&self.program)
            .args(["pm", "ls", "--all"])
            .current_dir(project_dir)
            .output()
            .map_err(|e| self.unavailable(e.to_string()))?;

        if !output.status.success() {
            return Err(malformed(
                lockfile_path,
                LockfileFormat::Bun,
                format!(
                    "'{} pm ls --all' exited with {}: {}",
                    self.program,
                    output.status,
                    String::from_utf8_lossy(&output.stderr).trim()
                ),
            ));
        }

        let listing = String::from_utf8_lossy(&output.stdout);
        Ok(parse_listing(&listing, default_project_name(lockfile_path)))
    }

    fn unavailable(&self, details: String) -> anyhow::Error {
        ScanError::ToolUnavailable {
            tool: self.program.clone(),
            details,
            hint: "bun.lockb is a binary format. Install Bun from https://bun.sh, or scan a project that uses npm, Yarn or pnpm".to_string(),
        }
        .into()
    }
}

impl Default for BunParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses `bun pm ls --all` output into a flat lockfile.
///
/// Each package line looks like `├── @scope/name@1.2.3`; the version is
/// whatever follows the last `@`. The header line naming the project's
/// `node_modules` directory is skipped.
pub(super) fn parse_listing(listing: &str, project_name: String) -> Lockfile {
    let mut lockfile = Lockfile::new(project_name, UNKNOWN_VERSION, BUN_FORMAT_VERSION);
    for line in listing.lines() {
        let line = line.trim().trim_start_matches(TREE_CHARS).trim();
        if line.is_empty() || line.starts_with("node_modules") || line.contains(" node_modules") {
            continue;
        }
        if let Some((name, version)) = split_listing_entry(line) {
            lockfile.register(Package::new(name, version));
        }
    }
    lockfile
}

fn split_listing_entry(line: &str) -> Option<(&str, &str)> {
    let at = line.rfind('@').filter(|&at| at > 0)?;
    let (name, version) = (&line[..at], line[at + 1..].trim());
    if name.is_empty() || version.is_empty() {
        return None;
    }
    Some((name, version))
}
