use std::path::PathBuf;

/// Errors from substrate operations.
#[derive(Debug, thiserror::Error)]
pub enum SubstrateError {
    /// I/O error from a file-backed substrate.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The persisted storage file is not a JSON object of string values.
    #[error("corrupt storage file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// A write would push the substrate past its byte quota.
    #[error("quota exceeded: {requested} bytes requested, quota is {quota} bytes")]
    QuotaExceeded { requested: u64, quota: u64 },

    /// A lock guarding the substrate state was poisoned by a panicking writer.
    #[error("substrate lock poisoned")]
    LockPoisoned,
}

/// Result alias for substrate operations.
pub type SubstrateResult<T> = Result<T, SubstrateError>;
