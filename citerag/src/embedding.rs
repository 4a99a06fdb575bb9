//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap a specific embedding backend (Ollama, a test double,
/// etc.) behind a unified async interface. The embedding must come from the
/// same model that produced the vectors stored in the queried collection.
///
/// # Example
///
/// ```rust,ignore
/// use citerag::{EmbeddingProvider, OllamaClient};
///
/// let provider = OllamaClient::new("http://localhost:11434", "mistral", "nomic-embed-text")?;
/// let embedding = provider.embed("hello world").await?;
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
