use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("failed to encode `{key}`: {source}")]
    Encode {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not prepare storage directory: {0}")]
    Io(#[from] std::io::Error),

    /// Backend refused the operation (used by fakes and closed stores).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
