use super::PathResolver;
use crate::scanning::domain::{Blocklist, BlocklistEntry, Finding, Graph, Node};
use std::cmp::Reverse;

/// GraphScanner service matching every graph node against a blocklist
pub struct GraphScanner;

impl GraphScanner {
    /// Scans every node of `graph`, reachable or not
    ///
    /// Paths are resolved only for flagged nodes. Findings are ordered by
    /// severity (highest first), then package name, then version.
    pub fn scan(graph: &Graph, blocklist: &Blocklist) -> Vec<Finding> {
        Self::scan_with_progress(graph, blocklist, |_, _| {})
    }

    /// Same as [`GraphScanner::scan`], calling `on_progress(done, total)` after each node
    pub fn scan_with_progress<F>(graph: &Graph, blocklist: &Blocklist, mut on_progress: F) -> Vec<Finding>
    where
        F: FnMut(usize, usize),
    {
        let total = graph.len();
        let mut findings = Vec::new();

        for (index, node) in graph.nodes().values().enumerate() {
            if let Some(entry) = Self::lookup(blocklist, node) {
                let path = PathResolver::find_path(graph, node.key());
                findings.push(Finding::new(node, entry, path));
            }
            on_progress(index + 1, total);
        }

        findings.sort_by(|a, b| {
            (Reverse(a.severity()), a.package_name(), a.version())
                .cmp(&(Reverse(b.severity()), b.package_name(), b.version()))
        });
        findings
    }

    /// Exact match on name and version; pnpm peer suffixes are part of the version.
    fn lookup<'a>(blocklist: &'a Blocklist, node: &Node) -> Option<&'a BlocklistEntry> {
        blocklist.is_blocked(node.name(), node.version())
    }
}
