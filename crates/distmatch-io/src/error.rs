//! Error types for scenario files and replays.

/// Result type alias for scenario I/O.
pub type Result<T> = std::result::Result<T, IoError>;

/// Error type for scenario loading, saving and replay.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Generic I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// RON parsing failed
    #[error("RON parse error: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    /// RON serialization failed
    #[error("RON error: {0}")]
    RonWrite(#[from] ron::Error),

    /// File extension is neither RON nor JSON
    #[error("Unsupported scenario format: {0}")]
    UnsupportedFormat(String),

    /// File exceeds the load limit
    #[error("Scenario file too large: {size} bytes (limit {limit} bytes)")]
    FileTooLarge {
        /// File size in bytes
        size: u64,
        /// Allowed size in bytes
        limit: u64,
    },

    /// Scenario was written by an incompatible version
    #[error("Scenario version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build reads
        expected: String,
        /// Version stored in the file
        found: String,
    },

    /// A tick or the scenario header names a sequence that is not defined
    #[error("Unknown sequence: {0}")]
    UnknownSequence(String),
}
