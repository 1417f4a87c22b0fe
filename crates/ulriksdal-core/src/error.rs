#![forbid(unsafe_code)]

/// Errors produced by the Ulriksdal algorithm registry and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The configuration document is missing, malformed, or has no
    /// `Configuration` root. Fatal to one load attempt.
    #[error("configuration document error: {0}")]
    ConfigDocument(String),

    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// A policy hook refused dispatch to the algorithm.
    #[error("algorithm rejected by policy: {0}")]
    AlgorithmRejected(String),

    #[error("implementation unavailable: {0}")]
    Unavailable(String),

    #[error("canonicalization error: {0}")]
    Canonicalization(String),

    #[error("transform error: {0}")]
    Transform(String),

    #[error("base64 decode error: {0}")]
    Base64(String),

    #[error("cryptographic error: {0}")]
    Crypto(String),

    #[error("key error: {0}")]
    Key(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// No resolver in the active chain claimed the reference.
    #[error("no resolver claimed reference: {0}")]
    Unresolvable(String),

    #[error("invalid URI reference: {0}")]
    InvalidUri(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
