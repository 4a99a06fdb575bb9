//! Vector store trait for similarity search over stored chunks.

use async_trait::async_trait;

use crate::document::SearchResult;
use crate::error::Result;

/// A read-only view of a vector store.
///
/// Populating the store is the job of an ingestion step outside this crate;
/// the query path only needs similarity search.
///
/// # Example
///
/// ```rust,ignore
/// use citerag::{ChromaVectorStore, VectorStore};
///
/// let store = ChromaVectorStore::new("http://localhost:8000")?;
/// let results = store.search("langchain", &query_embedding, 5).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Search for the `top_k` chunks most similar to the given embedding.
    ///
    /// Returns results ordered most relevant first. Scores are in the
    /// backend's native scale (similarity or distance).
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>>;
}
