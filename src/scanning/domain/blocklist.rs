use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Severity of a blocklisted release, ordered from `Info` (lowest) to `Critical`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            "info" => Ok(Severity::Info),
            other => Err(format!(
                "Invalid severity '{}'. Valid values: critical, high, medium, low, info",
                other
            )),
        }
    }
}

/// One compromised release.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlocklistEntry {
    package_name: String,
    version: String,
    severity: Severity,
    reason: String,
    cve: Option<String>,
}

impl BlocklistEntry {
    pub fn new(
        package_name: impl Into<String>,
        version: impl Into<String>,
        severity: Severity,
        reason: impl Into<String>,
        cve: Option<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            version: version.into(),
            severity,
            reason: reason.into(),
            cve: cve.filter(|c| !c.is_empty()),
        }
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn cve(&self) -> Option<&str> {
        self.cve.as_deref()
    }
}

/// Exact `(name, version)` lookup over blocklist entries.
///
/// Versions are compared as literal strings; no range semantics apply.
/// When the same pair is listed twice the first entry wins.
#[derive(Debug, Clone, Default)]
pub struct Blocklist {
    entries: Vec<BlocklistEntry>,
    index: HashMap<(String, String), usize>,
}

impl Blocklist {
    pub fn new(entries: Vec<BlocklistEntry>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (position, entry) in entries.iter().enumerate() {
            index
                .entry((entry.package_name.clone(), entry.version.clone()))
                .or_insert(position);
        }
        Self { entries, index }
    }

    /// Returns the entry for `name@version`, if that release is blocklisted.
    pub fn is_blocked(&self, name: &str, version: &str) -> Option<&BlocklistEntry> {
        self.index
            .get(&(name.to_string(), version.to_string()))
            .map(|&position| &self.entries[position])
    }

    pub fn entries(&self) -> &[BlocklistEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
