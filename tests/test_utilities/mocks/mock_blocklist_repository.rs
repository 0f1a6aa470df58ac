use hulud_scan::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Mock BlocklistRepository serving fixed entries and counting fetches
#[derive(Clone, Default)]
pub struct MockBlocklistRepository {
    entries: Vec<BlocklistEntry>,
    calls: Arc<AtomicUsize>,
    should_fail: bool,
}

impl MockBlocklistRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(
        mut self,
        name: &str,
        version: &str,
        severity: Severity,
        reason: &str,
        cve: Option<&str>,
    ) -> Self {
        self.entries.push(BlocklistEntry::new(
            name,
            version,
            severity,
            reason,
            cve.map(str::to_string),
        ));
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BlocklistRepository for MockBlocklistRepository {
    fn fetch_blocklist(&self, location: &str) -> Result<Blocklist> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            anyhow::bail!("Mock blocklist failure for {}", location);
        }
        Ok(Blocklist::new(self.entries.clone()))
    }
}
