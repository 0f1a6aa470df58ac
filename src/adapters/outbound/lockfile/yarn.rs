use super::{default_project_name, malformed, UNKNOWN_VERSION};
use crate::scanning::domain::{Lockfile, LockfileFormat, Package};
use crate::shared::Result;
use std::path::Path;
use tracing::debug;

/// Format version reported for Yarn lockfiles without a `__metadata` block.
const CLASSIC_FORMAT_VERSION: i64 = 1;

/// Key of the block Yarn 2+ writes at the top of the lockfile.
const METADATA_KEY: &str = "__metadata";

/// Nested block currently being read inside a package entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    None,
    /// `dependencies:` or `optionalDependencies:`, collected as edges
    Dependencies { indent: usize },
    /// Any other nested block (`peerDependencies:`, `dependenciesMeta:`, ...)
    Skipped { indent: usize },
    /// The `__metadata:` block
    Metadata,
}

/// Package entry being assembled.
#[derive(Debug, Default)]
struct Entry {
    name: String,
    version: String,
    resolved: String,
    integrity: String,
    dependencies: Vec<(String, String)>,
}

impl Entry {
    fn into_package(self) -> Package {
        let mut package = Package::new(self.name, self.version)
            .with_resolved(self.resolved)
            .with_integrity(self.integrity);
        for (name, range) in self.dependencies {
            package.add_dependency(name, range);
        }
        package
    }
}

/// Parses a `yarn.lock` file.
///
/// Line-oriented: a zero-indent line ending in `:` opens a package entry
/// whose first comma-separated spec names the package; indented
/// `version`, `resolved` and `integrity` keys fill it in and a
/// `dependencies:` block lists its edges until the indentation drops back.
/// Both the classic `key "value"` and the `key: value` spellings are
/// accepted. Yarn does not record direct dependencies; they come from the
/// manifest.
///
/// Stray top-level lines are skipped. The file is only rejected when it has
/// content but not a single package header.
pub(super) fn parse(content: &str, lockfile_path: &Path) -> Result<Lockfile> {
    let mut lockfile = Lockfile::new(
        default_project_name(lockfile_path),
        UNKNOWN_VERSION,
        CLASSIC_FORMAT_VERSION,
    );
    let mut current: Option<Entry> = None;
    let mut block = Block::None;
    let mut headers = 0usize;
    let mut skipped = 0usize;

    for (index, raw_line) in content.lines().enumerate() {
        let line = raw_line.trim_end();
        let trimmed = line.trim_start();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let indent = line.len() - trimmed.len();

        if indent == 0 {
            finish_entry(&mut lockfile, current.take());
            let Some(header) = trimmed.strip_suffix(':') else {
                debug!(line = index + 1, "skipping top-level line that is not a package entry");
                skipped += 1;
                block = Block::None;
                continue;
            };
            headers += 1;

            let first_spec = first_spec(header);
            if first_spec == METADATA_KEY {
                block = Block::Metadata;
                continue;
            }
            block = Block::None;
            if first_spec.contains("@workspace:") {
                debug!(spec = %first_spec, "skipping workspace entry");
                continue;
            }
            current = Some(Entry {
                name: package_name_from_spec(first_spec),
                ..Entry::default()
            });
            continue;
        }

        if block == Block::Metadata {
            let (key, value) = split_key_value(trimmed);
            if key == "version" {
                if let Ok(version) = value.parse::<i64>() {
                    lockfile.set_format_version(version);
                }
            }
            continue;
        }

        let Some(entry) = current.as_mut() else {
            continue;
        };

        match block {
            Block::Dependencies { indent: open } if indent > open => {
                let (name, range) = split_key_value(trimmed);
                if !name.is_empty() {
                    entry.dependencies.push((name.to_string(), range.to_string()));
                }
                continue;
            }
            Block::Skipped { indent: open } if indent > open => continue,
            _ => block = Block::None,
        }

        let (key, value) = split_key_value(trimmed);
        match key {
            "version" => entry.version = value.to_string(),
            "resolved" | "resolution" if entry.resolved.is_empty() => {
                entry.resolved = value.to_string()
            }
            "integrity" | "checksum" if entry.integrity.is_empty() => {
                entry.integrity = value.to_string()
            }
            "dependencies" | "optionalDependencies" if value.is_empty() => {
                block = Block::Dependencies { indent }
            }
            _ if value.is_empty() => block = Block::Skipped { indent },
            _ => {}
        }
    }
    finish_entry(&mut lockfile, current.take());

    if headers == 0 && skipped > 0 {
        return Err(malformed(
            lockfile_path,
            LockfileFormat::Yarn,
            "no package entries found",
        ));
    }
    Ok(lockfile)
}

fn finish_entry(lockfile: &mut Lockfile, entry: Option<Entry>) {
    if let Some(entry) = entry {
        if entry.name.is_empty() {
            return;
        }
        lockfile.register(entry.into_package());
    }
}

/// First spec of an entry header such as `"@babel/core@^7.0.0", "@babel/core@^7.1.0"`.
fn first_spec(header: &str) -> &str {
    let first = header.split(',').next().unwrap_or(header);
    strip_quotes(first.trim())
}

/// Package name of a single spec.
///
/// `lodash@^4.17.20` is `lodash`, `@babel/core@^7.0.0` is `@babel/core`
/// and the alias `package@npm:other@1.0.0` is `package`.
pub(super) fn package_name_from_spec(spec: &str) -> String {
    let spec = strip_quotes(spec.trim());
    if let Some((alias, _)) = spec.split_once("@npm:") {
        return alias.to_string();
    }
    // A leading '@' opens a scope, so the version separator is searched after it
    let search_from = usize::from(spec.starts_with('@'));
    match spec[search_from..].find('@') {
        Some(at) => spec[..search_from + at].to_string(),
        None => spec.to_string(),
    }
}

/// Splits `key "value"`, `key value` or `key: value` into its parts with
/// quotes removed. A bare `key:` yields an empty value.
fn split_key_value(content: &str) -> (&str, &str) {
    let (key, rest) = if let Some(stripped) = content.strip_prefix('"') {
        match stripped.find('"') {
            Some(end) => (&stripped[..end], &stripped[end + 1..]),
            None => (stripped, ""),
        }
    } else {
        match content.find(|c: char| c.is_whitespace()) {
            Some(end) => (&content[..end], &content[end..]),
            None => (content, ""),
        }
    };
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(':').unwrap_or(rest);
    let key = key.strip_suffix(':').unwrap_or(key);
    (key, strip_quotes(rest.trim()))
}

fn strip_quotes(value: &str) -> &str {
    value.trim_matches(|c| c == '"' || c == '\'')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanning::domain::node_modules_key;
    use std::path::PathBuf;

    fn lockfile_path() -> PathBuf {
        PathBuf::from("/work/yarn-app/yarn.lock")
    }

    const CLASSIC: &str = r#"# THIS IS AN AUTOGENERATED FILE. DO NOT EDIT THIS FILE DIRECTLY.
# yarn lockfile v1


"@babel/code-frame@^7.0.0", "@babel/code-frame@^7.22.13":
  version "7.22.13"
  resolved "https://registry.yarnpkg.com/@babel/code-frame/-/code-frame-7.22.13.tgz#e3c1c099402598483b7a8c46a721d1038803755e"
  integrity sha512-XktuhWlJ5g+3TJXc5upd9Ks1HutSArik6jf2eAjYFyIOf4ej3RN+184cZbzDvbPnuTJIUhPKKJE3cIsYTiAT3w==
  dependencies:
    "@babel/highlight" "^7.22.13"
    chalk "^2.4.2"

chalk@^2.4.2:
  version "2.4.2"
  resolved "https://registry.yarnpkg.com/chalk/-/chalk-2.4.2.tgz"
  dependencies:
    ansi-styles "^3.2.1"
  optionalDependencies:
    supports-color "^5.3.0"

"@babel/highlight@^7.22.13":
  version "7.22.20"

ansi-styles@^3.2.1:
  version "3.2.1"

supports-color@^5.3.0:
  version "5.5.0"

string-width-cjs@npm:string-width@^4.2.0:
  version "4.2.3"
"#;

    #[test]
    fn test_parse_classic_lockfile() {
        let lockfile = parse(CLASSIC, &lockfile_path()).unwrap();

        assert_eq!(lockfile.project_name(), "yarn-app");
        assert_eq!(lockfile.project_version(), "unknown");
        assert_eq!(lockfile.format_version(), 1);
        assert_eq!(lockfile.packages().len(), 6);
        assert!(lockfile.direct_dependencies().is_empty());

        let code_frame = &lockfile.packages()[&node_modules_key("@babel/code-frame")];
        assert_eq!(code_frame.name(), "@babel/code-frame");
        assert_eq!(code_frame.version(), "7.22.13");
        assert!(code_frame.resolved().unwrap().contains("code-frame-7.22.13.tgz"));
        assert!(code_frame.integrity().unwrap().starts_with("sha512-"));
        assert_eq!(code_frame.dependencies().len(), 2);
        assert_eq!(code_frame.dependencies()["@babel/highlight"], "^7.22.13");
        assert_eq!(code_frame.dependencies()["chalk"], "^2.4.2");
    }

    #[test]
    fn test_optional_dependencies_are_edges() {
        let lockfile = parse(CLASSIC, &lockfile_path()).unwrap();
        let chalk = &lockfile.packages()["node_modules/chalk"];
        assert_eq!(chalk.dependencies().len(), 2);
        assert!(chalk.dependencies().contains_key("supports-color"));
    }

    #[test]
    fn test_alias_entry_uses_alias_name() {
        let lockfile = parse(CLASSIC, &lockfile_path()).unwrap();
        let alias = &lockfile.packages()["node_modules/string-width-cjs"];
        assert_eq!(alias.name(), "string-width-cjs");
        assert_eq!(alias.version(), "4.2.3");
    }

    #[test]
    fn test_package_name_from_spec() {
        assert_eq!(package_name_from_spec("lodash@^4.17.20"), "lodash");
        assert_eq!(package_name_from_spec("@babel/core@^7.0.0"), "@babel/core");
        assert_eq!(package_name_from_spec("package@npm:other@1.0.0"), "package");
        assert_eq!(package_name_from_spec("\"@scope/alias@npm:@other/pkg@1.0.0\""), "@scope/alias");
        assert_eq!(package_name_from_spec("left-pad"), "left-pad");
    }

    #[test]
    fn test_duplicate_names_keep_both_versions() {
        let content = "debug@^2.6.9:\n  version \"2.6.9\"\n\ndebug@^4.3.4:\n  version \"4.3.4\"\n";
        let lockfile = parse(content, &lockfile_path()).unwrap();

        assert_eq!(lockfile.packages()["node_modules/debug"].version(), "2.6.9");
        assert_eq!(lockfile.packages()["node_modules/debug@4.3.4"].version(), "4.3.4");
    }

    #[test]
    fn test_parse_berry_lockfile() {
        let content = r#"# This file is generated by running "yarn install" inside your project.

__metadata:
  version: 6
  cacheKey: 8

"lodash@npm:^4.17.21":
  version: 4.17.21
  resolution: "lodash@npm:4.17.21"
  checksum: eb835a2e51d381e561e508ce932ea50a8e5a68f4ebdd771ea240d3048244a8d13658acbd502cd4829768c56f2e16bdd4340b9ea141297d472517b83868e677f7
  languageName: node
  linkType: hard

"my-app@workspace:.":
  version: 0.0.0-use.local
  resolution: "my-app@workspace:."
  dependencies:
    lodash: ^4.17.21
  languageName: unknown
  linkType: soft
"#;
        let lockfile = parse(content, &lockfile_path()).unwrap();

        assert_eq!(lockfile.format_version(), 6);
        assert_eq!(lockfile.packages().len(), 1);
        let lodash = &lockfile.packages()["node_modules/lodash"];
        assert_eq!(lodash.version(), "4.17.21");
        assert_eq!(lodash.resolved(), Some("lodash@npm:4.17.21"));
    }

    #[test]
    fn test_dependencies_block_ends_on_dedent() {
        let content = "a@^1.0.0:\n  dependencies:\n    b \"^1.0.0\"\n  version \"1.0.0\"\n";
        let lockfile = parse(content, &lockfile_path()).unwrap();
        let a = &lockfile.packages()["node_modules/a"];
        assert_eq!(a.version(), "1.0.0");
        assert_eq!(a.dependencies().len(), 1);
    }

    #[test]
    fn test_stray_top_level_line_is_skipped() {
        let content = "# yarn lockfile v1\n\nlodash@^4.17.20:\n  version \"4.17.20\"\n\nstray-garbage-line\nms@^2.1.3:\n  version \"2.1.3\"\n";
        let lockfile = parse(content, &lockfile_path()).unwrap();

        assert_eq!(lockfile.packages().len(), 2);
        assert_eq!(lockfile.packages()["node_modules/lodash"].version(), "4.17.20");
        assert_eq!(lockfile.packages()["node_modules/ms"].version(), "2.1.3");
    }

    #[test]
    fn test_content_without_any_entry_is_malformed() {
        let err = parse("{\"not\": \"yarn\"}\n", &lockfile_path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse Yarn lockfile"));
    }
}
