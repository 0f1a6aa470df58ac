use crate::scanning::domain::{node_modules_key, Depth, Graph, Lockfile, Node, Package, ROOT_KEY};
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

/// GraphBuilder service turning a [`Lockfile`] into a [`Graph`]
///
/// Pure logic, no I/O. Building never fails: edges whose target is not
/// installed at `node_modules/<name>` are dropped and nodes the root cannot
/// reach are marked [`Depth::Unreachable`].
pub struct GraphBuilder;

impl GraphBuilder {
    /// Builds the dependency graph for `lockfile`
    ///
    /// # Arguments
    /// * `lockfile` - Canonical lockfile produced by one of the parsers
    ///
    /// # Returns
    /// A graph with one node per lockfile package, direct dependencies wired
    /// from the synthetic root, and BFS depths assigned
    pub fn build(lockfile: &Lockfile) -> Graph {
        let mut root = Node::new(
            ROOT_KEY,
            Package::new(lockfile.project_name(), lockfile.project_version()),
        );
        root.set_depth(Depth::Reachable(0));

        let mut nodes: BTreeMap<String, Node> = lockfile
            .packages()
            .iter()
            .map(|(key, package)| (key.clone(), Node::new(key.clone(), package.clone())))
            .collect();

        Self::wire_dependencies(lockfile, &mut nodes);
        Self::wire_direct_dependencies(lockfile, &mut root, &mut nodes);
        Self::assign_depths(&root, &mut nodes);

        Graph::new(root, nodes)
    }

    fn wire_dependencies(lockfile: &Lockfile, nodes: &mut BTreeMap<String, Node>) {
        let mut dropped = 0usize;
        for (key, package) in lockfile.packages() {
            for dependency in package.dependencies().keys() {
                let target = node_modules_key(dependency);
                if !nodes.contains_key(&target) {
                    dropped += 1;
                    continue;
                }
                if let Some(node) = nodes.get_mut(key) {
                    node.add_dependency(target);
                }
            }
        }
        if dropped > 0 {
            debug!(dropped, "dependency edges without a top-level install were dropped");
        }
    }

    fn wire_direct_dependencies(
        lockfile: &Lockfile,
        root: &mut Node,
        nodes: &mut BTreeMap<String, Node>,
    ) {
        for name in lockfile.direct_dependencies().keys() {
            let target = node_modules_key(name);
            match nodes.get_mut(&target) {
                Some(node) => {
                    node.mark_direct();
                    node.set_depth(Depth::Reachable(1));
                    root.add_dependency(target);
                }
                None => debug!(dependency = %name, "direct dependency is not in the lockfile"),
            }
        }
    }

    /// Level-order traversal from the root; the first visit fixes a node's depth.
    fn assign_depths(root: &Node, nodes: &mut BTreeMap<String, Node>) {
        let mut visited: BTreeMap<String, usize> = BTreeMap::new();
        let mut queue: VecDeque<(String, usize)> = root
            .dependencies()
            .iter()
            .map(|key| (key.clone(), 1))
            .collect();

        while let Some((key, depth)) = queue.pop_front() {
            if visited.contains_key(&key) {
                continue;
            }
            visited.insert(key.clone(), depth);
            if let Some(node) = nodes.get(&key) {
                for next in node.dependencies() {
                    if !visited.contains_key(next) {
                        queue.push_back((next.clone(), depth + 1));
                    }
                }
            }
        }

        for (key, node) in nodes.iter_mut() {
            match visited.get(key) {
                Some(&depth) => node.set_depth(Depth::Reachable(depth)),
                None => node.set_depth(Depth::Unreachable),
            }
        }
        debug_assert!(nodes.values().all(|n| n.depth() != Depth::Unresolved));
    }
}
