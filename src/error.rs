//! Error types for the offline cache proxy.

use std::fmt;

/// Result type for proxy operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the offline cache proxy.
///
/// All store/network operations return `Result<T>` where `Result` is defined as
/// `std::result::Result<T, Error>`. Different variants represent different failure modes.
///
/// Note that the fetch path never surfaces these errors to the request caller:
/// every failure there degrades to a synthesized offline response. The install
/// path is the only handler allowed to fail loudly.
#[derive(Debug, Clone)]
pub enum Error {
    /// Serialization failed when encoding a response snapshot for storage.
    ///
    /// Common causes:
    /// - Postcard codec error
    /// - Serde serialization error
    SerializationError(String),

    /// Deserialization failed when decoding a stored snapshot.
    ///
    /// This indicates corrupted or malformed data in a cache partition.
    ///
    /// **Recovery:** The entry is evicted and the lookup treated as a miss.
    DeserializationError(String),

    /// Partition storage error (quota exceeded, storage disabled).
    ///
    /// This indicates the host denied a cache open/read/write.
    ///
    /// **Recovery:** Treated as a cache miss by the strategy executor;
    /// the strategy still attempts network or falls back to an offline response.
    StorageError(String),

    /// Network fetch rejected (DNS failure, connection refused, timeout).
    ///
    /// HTTP error statuses are *not* network failures - those responses are
    /// passed through to the caller.
    ///
    /// **Recovery:** Fall back to cache or a synthesized offline response per
    /// strategy. Never retried automatically.
    NetworkError(String),

    /// Install failed: a precache manifest URL could not be fetched.
    ///
    /// The whole install step fails and the worker does not activate.
    InstallError(String),

    /// Configuration error during proxy construction.
    ///
    /// Common causes:
    /// - Empty cache version string
    /// - Empty precache manifest
    ConfigError(String),

    /// Invalid snapshot: corrupted envelope or bad magic.
    ///
    /// Returned when:
    /// - Magic header is not `b"OKIT"`
    /// - Envelope deserialization fails
    ///
    /// **Recovery:** Evict the entry and treat as a miss.
    InvalidSnapshot(String),

    /// Schema version mismatch between code and a stored snapshot.
    ///
    /// Raised when `CURRENT_SCHEMA_VERSION` changed since the entry was stored.
    ///
    /// **Recovery:** Entry is evicted and refetched on next access.
    /// No action needed - this is expected during deployments.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from stored entry)
        found: u32,
    },

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::StorageError(msg) => write!(f, "Storage error: {}", msg),
            Error::NetworkError(msg) => write!(f, "Network error: {}", msg),
            Error::InstallError(msg) => write!(f, "Install error: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::InvalidSnapshot(msg) => write!(f, "Invalid snapshot: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Snapshot version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            Error::StorageError(e.to_string())
        } else if e.is_syntax() {
            Error::DeserializationError(e.to_string())
        } else {
            Error::SerializationError(e.to_string())
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::StorageError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}
