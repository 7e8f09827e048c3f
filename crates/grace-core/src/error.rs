use thiserror::Error;

/// Top-level error type for Grace.
#[derive(Debug, Error)]
pub enum GraceError {
    /// Transport or protocol error from an AI provider.
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider refused the configured credential.
    #[error("credential rejected: {0}")]
    CredentialRejected(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// Profile storage error.
    #[error("memory error: {0}")]
    Memory(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
