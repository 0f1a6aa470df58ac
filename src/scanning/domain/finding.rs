use super::{BlocklistEntry, Depth, Node, Severity};

/// A scanned package that matched a blocklist entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    package_key: String,
    package_name: String,
    version: String,
    path: Option<Vec<String>>,
    severity: Severity,
    reason: String,
    cve: Option<String>,
    is_direct: bool,
    depth: Depth,
}

impl Finding {
    /// Builds a finding for `node` matched by `entry`.
    ///
    /// `path` is `None` when the node cannot be reached from the project root.
    pub fn new(node: &Node, entry: &BlocklistEntry, path: Option<Vec<String>>) -> Self {
        Self {
            package_key: node.key().to_string(),
            package_name: node.name().to_string(),
            version: node.version().to_string(),
            path,
            severity: entry.severity(),
            reason: entry.reason().to_string(),
            cve: entry.cve().map(str::to_string),
            is_direct: node.is_direct(),
            depth: node.depth(),
        }
    }

    /// Install-path key of the flagged node.
    pub fn package_key(&self) -> &str {
        &self.package_key
    }

    pub fn package_name(&self) -> &str {
        &self.package_name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Package names from the project root down to the flagged package.
    pub fn path(&self) -> Option<&[String]> {
        self.path.as_deref()
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

    pub fn is_direct(&self) -> bool {
        self.is_direct
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }
}
