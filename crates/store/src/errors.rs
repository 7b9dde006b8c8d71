use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be reached or read/written at all.
    #[error("store unavailable: {0}")]
    Unavailable(String),
    /// Create hit an identifier that already exists.
    #[error("identifier already exists: {0}")]
    Conflict(String),
    /// The caller handed the store something it cannot honor, e.g. a
    /// malformed page token.
    #[error("invalid store request: {0}")]
    Invalid(String),
}
