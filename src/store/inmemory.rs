//! In-memory partition store (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! Each partition is itself a DashMap, so concurrent writes to different
//! keys never contend and a same-key race is a plain last-write-wins.

use super::CacheStore;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;

/// Thread-safe async in-memory partition store.
///
/// Stands in for the host's durable cache storage: the partition→entries
/// two-level map mirrors the named-cache model, and all operations are
/// atomic per key. Clones share the same underlying storage.
///
/// # Example
///
/// ```no_run
/// use offline_kit::store::{CacheStore, InMemoryStore};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let store = InMemoryStore::new();
///
///     store.put("static-v1.0.0", "GET /app.js", b"bytes".to_vec()).await?;
///     let value = store.get("static-v1.0.0", "GET /app.js").await?;
///     assert!(value.is_some());
///
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct InMemoryStore {
    partitions: Arc<DashMap<String, DashMap<String, Vec<u8>>>>,
}

impl InMemoryStore {
    /// Create a new in-memory partition store.
    pub fn new() -> Self {
        InMemoryStore {
            partitions: Arc::new(DashMap::new()),
        }
    }

    /// Number of entries in a partition (0 if it does not exist).
    pub async fn len(&self, partition: &str) -> usize {
        self.partitions
            .get(partition)
            .map(|p| p.len())
            .unwrap_or(0)
    }

    /// Check if a partition is empty or absent.
    pub async fn is_empty(&self, partition: &str) -> bool {
        self.len(partition).await == 0
    }

    /// Get storage statistics across all partitions.
    pub async fn stats(&self) -> StoreStats {
        let mut total_entries = 0;
        let mut total_bytes = 0;
        for partition in self.partitions.iter() {
            total_entries += partition.len();
            total_bytes += partition.iter().map(|entry| entry.len()).sum::<usize>();
        }

        StoreStats {
            partition_count: self.partitions.len(),
            total_entries,
            total_bytes,
        }
    }

    /// Print storage statistics to debug log.
    pub async fn log_stats(&self) {
        let stats = self.stats().await;
        debug!(
            "Store Stats: {} partitions, {} entries, {} bytes",
            stats.partition_count, stats.total_entries, stats.total_bytes
        );
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CacheStore for InMemoryStore {
    async fn open_partition(&self, name: &str) -> Result<()> {
        self.partitions
            .entry(name.to_string())
            .or_insert_with(DashMap::new);
        debug!("✓ InMemory OPEN partition {}", name);
        Ok(())
    }

    async fn get(&self, partition: &str, key: &str) -> Result<Option<Vec<u8>>> {
        if let Some(entries) = self.partitions.get(partition) {
            if let Some(value) = entries.get(key) {
                debug!("✓ InMemory GET {}/{} -> HIT", partition, key);
                return Ok(Some(value.clone()));
            }
        }

        debug!("✓ InMemory GET {}/{} -> MISS", partition, key);
        Ok(None)
    }

    async fn put(&self, partition: &str, key: &str, value: Vec<u8>) -> Result<()> {
        let entries = self
            .partitions
            .entry(partition.to_string())
            .or_insert_with(DashMap::new);
        entries.insert(key.to_string(), value);
        debug!("✓ InMemory PUT {}/{}", partition, key);
        Ok(())
    }

    async fn delete(&self, partition: &str, key: &str) -> Result<()> {
        if let Some(entries) = self.partitions.get(partition) {
            entries.remove(key);
        }
        debug!("✓ InMemory DELETE {}/{}", partition, key);
        Ok(())
    }

    async fn list_partitions(&self) -> Result<Vec<String>> {
        Ok(self
            .partitions
            .iter()
            .map(|entry| entry.key().clone())
            .collect())
    }

    async fn delete_partition(&self, name: &str) -> Result<bool> {
        let removed = self.partitions.remove(name).is_some();
        if removed {
            warn!("⚠ InMemory DELETE_PARTITION {} - all entries dropped", name);
        }
        Ok(removed)
    }

    async fn exists(&self, partition: &str, key: &str) -> Result<bool> {
        Ok(self
            .partitions
            .get(partition)
            .map(|entries| entries.contains_key(key))
            .unwrap_or(false))
    }
}

/// Storage statistics.
#[derive(Clone, Debug)]
pub struct StoreStats {
    pub partition_count: usize,
    pub total_entries: usize,
    pub total_bytes: usize,
}
