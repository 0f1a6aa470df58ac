use super::Package;
use std::collections::BTreeMap;
use std::fmt;

/// Key of the synthetic project root. Never present in [`Graph::nodes`].
pub const ROOT_KEY: &str = "";

/// Distance of a node from the project root.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    /// Not yet assigned. Never survives graph construction.
    Unresolved,
    /// Minimum number of edges from the root.
    Reachable(usize),
    /// Present in the lockfile but not reachable from the root.
    Unreachable,
}

impl Depth {
    /// Numeric depth, if the node is reachable.
    pub fn value(self) -> Option<usize> {
        match self {
            Depth::Reachable(depth) => Some(depth),
            Depth::Unresolved | Depth::Unreachable => None,
        }
    }

    pub fn is_reachable(self) -> bool {
        matches!(self, Depth::Reachable(_))
    }
}

impl fmt::Display for Depth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Depth::Reachable(depth) => write!(f, "{}", depth),
            Depth::Unreachable => write!(f, "unreachable"),
            Depth::Unresolved => write!(f, "unresolved"),
        }
    }
}

/// One package in the dependency graph.
///
/// Edges are stored as keys into [`Graph::nodes`]; the graph is the sole
/// owner of every node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    key: String,
    package: Package,
    dependencies: Vec<String>,
    is_direct: bool,
    depth: Depth,
}

impl Node {
    pub(crate) fn new(key: impl Into<String>, package: Package) -> Self {
        Self {
            key: key.into(),
            package,
            dependencies: Vec::new(),
            is_direct: false,
            depth: Depth::Unresolved,
        }
    }

    pub(crate) fn add_dependency(&mut self, key: String) {
        if !self.dependencies.contains(&key) {
            self.dependencies.push(key);
        }
    }

    pub(crate) fn mark_direct(&mut self) {
        self.is_direct = true;
    }

    pub(crate) fn set_depth(&mut self, depth: Depth) {
        self.depth = depth;
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn name(&self) -> &str {
        self.package.name()
    }

    pub fn version(&self) -> &str {
        self.package.version()
    }

    /// Keys of the nodes this node depends on, in wiring order.
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    pub fn is_direct(&self) -> bool {
        self.is_direct
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }
}

/// Dependency graph built from a single lockfile.
///
/// Read-only once built. Reverse edges live in a derived `dependents` index
/// rather than as back-references on the nodes.
#[derive(Debug, Clone)]
pub struct Graph {
    root: Node,
    nodes: BTreeMap<String, Node>,
    dependents: BTreeMap<String, Vec<String>>,
}

impl Graph {
    pub(crate) fn new(root: Node, nodes: BTreeMap<String, Node>) -> Self {
        let mut dependents: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for from in std::iter::once(&root).chain(nodes.values()) {
            for to in from.dependencies() {
                dependents
                    .entry(to.clone())
                    .or_default()
                    .push(from.key().to_string());
            }
        }
        Self {
            root,
            nodes,
            dependents,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn nodes(&self) -> &BTreeMap<String, Node> {
        &self.nodes
    }

    /// Looks up a node by key. The root key resolves to the root node.
    pub fn node(&self, key: &str) -> Option<&Node> {
        if key == ROOT_KEY {
            Some(&self.root)
        } else {
            self.nodes.get(key)
        }
    }

    /// Keys of the nodes that depend on `key`. The root appears as [`ROOT_KEY`].
    pub fn dependents(&self, key: &str) -> &[String] {
        self.dependents.get(key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of package nodes, root excluded.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn direct_count(&self) -> usize {
        self.nodes.values().filter(|n| n.is_direct()).count()
    }

    pub fn transitive_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| !n.is_direct() && n.depth().is_reachable())
            .count()
    }

    pub fn unreachable_count(&self) -> usize {
        self.nodes
            .values()
            .filter(|n| n.depth() == Depth::Unreachable)
            .count()
    }
}
