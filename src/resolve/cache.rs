use crate::resolve::lines::LineIndex;
use crate::tree::TreeIndex;
use crate::ts::SyntaxInfo;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace};
use xxhash_rust::xxh3::xxh3_64;

/// A built tree together with the line table of its source.
#[derive(Debug, Clone)]
pub struct CachedTree {
    pub tree: Arc<TreeIndex<SyntaxInfo>>,
    pub lines: Arc<LineIndex>,
    hash: u64,
}

/// Built trees keyed by source identifier.
///
/// An entry is rebuilt when the xxh3 hash of the source text changes. When
/// the cache holds `capacity` entries and a new one arrives, every entry is
/// dropped first.
#[derive(Debug)]
pub struct TreeCache {
    capacity: usize,
    entries: HashMap<String, CachedTree>,
}

impl TreeCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Return the cached tree for `source_id`, building it with `build` when
    /// missing or stale.
    pub fn get_or_build<E, F>(
        &mut self,
        source_id: &str,
        text: &str,
        build: F,
    ) -> Result<CachedTree, E>
    where
        F: FnOnce() -> Result<TreeIndex<SyntaxInfo>, E>,
    {
        let hash = xxh3_64(text.as_bytes());
        if let Some(entry) = self.entries.get(source_id) {
            if entry.hash == hash {
                trace!(source = source_id, "tree cache hit");
                return Ok(entry.clone());
            }
            debug!(source = source_id, "source changed, rebuilding tree");
        }

        let entry = CachedTree {
            tree: Arc::new(build()?),
            lines: Arc::new(LineIndex::new(text)),
            hash,
        };
        if !self.entries.contains_key(source_id) && self.entries.len() >= self.capacity {
            debug!(capacity = self.capacity, "tree cache full, clearing");
            self.entries.clear();
        }
        self.entries.insert(source_id.to_string(), entry.clone());
        Ok(entry)
    }
}
