//! Postcard-based snapshot serialization with versioned envelopes.
//!
//! This module provides the canonical encoding for response snapshots stored
//! in cache partitions. It uses Postcard for performance and wraps every
//! snapshot in a versioned envelope so corruption and schema drift are
//! detected on read instead of silently decoded.
//!
//! # Format
//!
//! ```text
//! ┌─────────────────┬─────────────────┬──────────────────────────┐
//! │  MAGIC (4 bytes)│VERSION (4 bytes)│POSTCARD PAYLOAD (N bytes)│
//! └─────────────────┴─────────────────┴──────────────────────────┘
//!   "OKIT"              u32 (LE)          postcard::to_allocvec
//! ```
//!
//! # Guarantees
//!
//! - **Deterministic:** The same response always produces identical bytes
//! - **Validated:** Magic and version checked on every decode
//! - **Versioned:** Schema changes force eviction, not silent migration
//!
//! A failed decode is never fatal: the strategy executor evicts the entry
//! and treats the lookup as a cache miss.

use crate::error::{Error, Result};
use crate::http::Response;
use serde::{Deserialize, Serialize};

/// Magic header for offline-kit snapshots: b"OKIT"
pub const SNAPSHOT_MAGIC: [u8; 4] = *b"OKIT";

/// Current snapshot schema version.
///
/// Increment when making breaking changes to [`Response`]:
/// - Adding/removing fields
/// - Changing field types or order
///
/// Old entries are then evicted and refetched on next access.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

/// Versioned envelope wrapping every stored snapshot.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SnapshotEnvelope<T> {
    /// Magic header: must be b"OKIT"
    pub magic: [u8; 4],
    /// Schema version: must match CURRENT_SCHEMA_VERSION
    pub version: u32,
    /// The snapshot itself
    pub payload: T,
}

impl<T> SnapshotEnvelope<T> {
    /// Wrap a payload with the current magic and version.
    pub fn new(payload: T) -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: CURRENT_SCHEMA_VERSION,
            payload,
        }
    }
}

/// Encode a response snapshot for partition storage.
///
/// # Errors
///
/// Returns `Error::SerializationError` if Postcard serialization fails.
pub fn encode_snapshot(response: &Response) -> Result<Vec<u8>> {
    let envelope = SnapshotEnvelope::new(response);
    postcard::to_allocvec(&envelope).map_err(|e| {
        error!("Snapshot serialization failed: {}", e);
        Error::SerializationError(e.to_string())
    })
}

/// Decode a stored snapshot with validation.
///
/// Validation order: envelope decode, then magic, then schema version.
///
/// # Errors
///
/// - `Error::DeserializationError`: corrupted Postcard payload
/// - `Error::InvalidSnapshot`: magic header mismatch
/// - `Error::VersionMismatch`: schema version mismatch
pub fn decode_snapshot(bytes: &[u8]) -> Result<Response> {
    let envelope: SnapshotEnvelope<Response> = postcard::from_bytes(bytes).map_err(|e| {
        error!("Snapshot deserialization failed: {}", e);
        Error::DeserializationError(e.to_string())
    })?;

    if envelope.magic != SNAPSHOT_MAGIC {
        warn!(
            "Invalid snapshot: expected magic {:?}, got {:?}",
            SNAPSHOT_MAGIC, envelope.magic
        );
        return Err(Error::InvalidSnapshot(format!(
            "Invalid magic: expected {:?}, got {:?}",
            SNAPSHOT_MAGIC, envelope.magic
        )));
    }

    if envelope.version != CURRENT_SCHEMA_VERSION {
        warn!(
            "Snapshot version mismatch: expected {}, got {}",
            CURRENT_SCHEMA_VERSION, envelope.version
        );
        return Err(Error::VersionMismatch {
            expected: CURRENT_SCHEMA_VERSION,
            found: envelope.version,
        });
    }

    Ok(envelope.payload)
}
