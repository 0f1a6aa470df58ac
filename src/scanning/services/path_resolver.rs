use crate::scanning::domain::{Graph, ROOT_KEY};
use std::collections::{HashMap, VecDeque};

/// PathResolver service reconstructing root-to-package paths on demand
pub struct PathResolver;

impl PathResolver {
    /// Finds a shortest path from the project root to `target_key`
    ///
    /// # Arguments
    /// * `graph` - Built dependency graph
    /// * `target_key` - Install-path key of the package, e.g. `node_modules/body-parser`
    ///
    /// # Returns
    /// Package names from the root to the target, both included, or `None`
    /// when the key is not in the graph or cannot be reached from the root.
    /// Among equal-length paths the one found first in edge order is returned.
    pub fn find_path(graph: &Graph, target_key: &str) -> Option<Vec<String>> {
        if !graph.nodes().contains_key(target_key) {
            return None;
        }

        let mut predecessors: HashMap<&str, &str> = HashMap::new();
        let mut queue: VecDeque<&str> = VecDeque::new();
        queue.push_back(ROOT_KEY);

        while let Some(current) = queue.pop_front() {
            if current == target_key {
                return Some(Self::reconstruct(graph, &predecessors, current));
            }
            let Some(node) = graph.node(current) else {
                continue;
            };
            for next in node.dependencies() {
                let next = next.as_str();
                if next == ROOT_KEY || predecessors.contains_key(next) {
                    continue;
                }
                predecessors.insert(next, current);
                queue.push_back(next);
            }
        }
        None
    }

    fn reconstruct(graph: &Graph, predecessors: &HashMap<&str, &str>, target: &str) -> Vec<String> {
        let mut keys = vec![target];
        let mut current = target;
        while let Some(&previous) = predecessors.get(current) {
            keys.push(previous);
            current = previous;
        }
        keys.iter()
            .rev()
            .filter_map(|key| graph.node(key))
            .map(|node| node.name().to_string())
            .collect()
    }
}
