//! Error taxonomy
//!
//! Only store failures and validation failures reach the user.
//! Remote manifest and enrichment failures are absorbed where they happen
//! and are never part of a public `Result`.

/// Failure of the local durable store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The data directory could not be created
    #[error("Failed to prepare store directory: {0}")]
    Io(#[from] std::io::Error),

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// A stored row could not be decoded back into a record
    #[error("Corrupt record {id}: {reason}")]
    Corrupt { id: String, reason: String },

    #[error("Store lock poisoned")]
    Poisoned,

    #[error("Store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    /// The store could not be opened at all
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Failure to obtain the remote manifest
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Manifest server returned {0}")]
    Status(u16),

    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed manifest: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A submission that cannot be written
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Title is required")]
    MissingTitle,

    #[error("Description is required")]
    MissingDescription,

    #[error("Missing media resource")]
    MissingMedia,

    #[error("No work with id {0}")]
    UnknownRecord(String),
}

/// Top-level error for gallery operations
#[derive(Debug, thiserror::Error)]
pub enum GalleryError {
    #[error("Admin mode required")]
    Forbidden,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Storage failed: {0}")]
    Store(#[from] StoreError),

    #[error("Failed to read media: {0}")]
    Media(std::io::Error),

    #[error("Failed to write export: {0}")]
    Export(std::io::Error),

    #[error("Failed to encode catalog: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No work with id {0}")]
    NotFound(String),
}
