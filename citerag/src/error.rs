//! Error types for the `citerag` crate.

use thiserror::Error;

/// Errors that can occur in retrieval, generation, and setup operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error occurred in the vector store backend.
    #[error("Vector store error ({backend}): {message}")]
    VectorStoreError {
        /// The vector store backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// The language model failed to produce a completion.
    #[error("Model error ({model}): {message}")]
    ModelError {
        /// The model that was invoked.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// An endpoint could not be reached.
    #[error("Cannot reach {endpoint}: {message}")]
    Connectivity {
        /// The URL that was contacted.
        endpoint: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation or loading error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in the query pipeline orchestration.
    #[error("Pipeline error: {0}")]
    PipelineError(String),

    /// Installing an external dependency (such as a model) failed.
    #[error("Dependency install failed: {0}")]
    DependencyInstall(String),

    /// A filesystem operation failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for citerag operations.
pub type Result<T> = std::result::Result<T, RagError>;
