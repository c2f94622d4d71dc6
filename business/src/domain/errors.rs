/// Remote document store errors for domain layer.
/// Use code-style identifiers for all error variants for i18n compatibility.
#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("remote.not_found")]
    NotFound,
    #[error("remote.network")]
    Network,
    #[error("remote.decode")]
    Decode,
    #[error("remote.persistence")]
    Persistence,
}

/// Local durable storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage.io")]
    Io,
    #[error("storage.decode")]
    Decode,
}
