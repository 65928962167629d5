//! Cache partition store implementations.

use crate::error::Result;

pub mod inmemory;

pub use inmemory::InMemoryStore;

/// Trait for partitioned cache storage.
///
/// Abstracts the host's durable request→response storage: named partitions,
/// each an exact-key map from request identity to an encoded snapshot.
/// Partitions are created lazily and are only ever destroyed by
/// [`delete_partition`](CacheStore::delete_partition) during activation
/// cleanup (or by the host evicting storage under pressure, which callers
/// must treat as a cache miss, not an error).
///
/// **IMPORTANT:** All methods use `&self` instead of `&mut self` to allow
/// concurrent access. Implementations should use interior mutability
/// (DashMap, RwLock, or external storage). Per-key put/get must be atomic;
/// a same-key race between two in-flight requests is last-write-wins on an
/// atomic snapshot, which is harmless.
///
/// **ASYNC:** All methods are async and must be awaited.
#[allow(async_fn_in_trait)]
pub trait CacheStore: Send + Sync + Clone {
    /// Idempotently open (create if absent) a named partition.
    ///
    /// # Errors
    /// Returns `Err` if the host denies allocation (quota exceeded).
    async fn open_partition(&self, name: &str) -> Result<()>;

    /// Retrieve an encoded snapshot by exact request key.
    ///
    /// # Returns
    /// - `Ok(Some(bytes))` - entry found
    /// - `Ok(None)` - miss (absent key, absent partition, or host eviction)
    ///
    /// # Errors
    /// Returns `Err` if a storage-level error occurs.
    async fn get(&self, partition: &str, key: &str) -> Result<Option<Vec<u8>>>;

    /// Store an encoded snapshot under the given key, creating the
    /// partition if needed.
    ///
    /// Callers are responsible for only storing snapshots of responses
    /// with a 2xx status.
    ///
    /// # Errors
    /// Returns `Err` if a storage-level error occurs.
    async fn put(&self, partition: &str, key: &str, value: Vec<u8>) -> Result<()>;

    /// Remove a single entry.
    ///
    /// # Errors
    /// Returns `Err` if a storage-level error occurs.
    async fn delete(&self, partition: &str, key: &str) -> Result<()>;

    /// Names of all existing partitions. Used only during activation cleanup.
    ///
    /// # Errors
    /// Returns `Err` if a storage-level error occurs.
    async fn list_partitions(&self) -> Result<Vec<String>>;

    /// Delete a whole partition. Returns whether it existed.
    ///
    /// # Errors
    /// Returns `Err` if a storage-level error occurs.
    async fn delete_partition(&self, name: &str) -> Result<bool>;

    /// Check if a key exists (optional optimization).
    ///
    /// # Errors
    /// Returns `Err` if a storage-level error occurs.
    async fn exists(&self, partition: &str, key: &str) -> Result<bool> {
        Ok(self.get(partition, key).await?.is_some())
    }
}
