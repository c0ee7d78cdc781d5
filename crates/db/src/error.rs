use catalog_core::error::CoreError;
use catalog_core::types::RecordId;

/// Failures raised by a record store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Connection-level failure: network loss, TLS, pool exhaustion or shutdown.
    #[error("Record store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),

    #[error("A record with id {0} already exists")]
    DuplicateId(RecordId),

    /// A stored document could not be decoded.
    #[error("Undecodable stored document: {0}")]
    Document(String),

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),
}

impl StoreError {
    /// Classify a sqlx error.
    ///
    /// Connection-level failures are logged here, once per failed operation,
    /// and never escalate beyond the operation that hit them.
    pub fn from_sqlx(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => {
                tracing::error!(error = %err, "Record store connection error");
                StoreError::Unavailable(err)
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                StoreError::Document(err.to_string())
            }
            other => StoreError::Database(other),
        }
    }

    /// Whether this failure came from losing the connection to the store.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

/// Failures raised by a repository operation.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Not-found, validation and conflict outcomes.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
