//! Data types for stored chunks, search results, and retrieved passages.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::source::UNKNOWN;

/// Metadata key under which a chunk's source identifier is stored.
pub const SOURCE_METADATA_KEY: &str = "id";

/// A stored segment of a document with its vector embedding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Unique identifier for the chunk within its collection.
    pub id: String,
    /// The text content of the chunk.
    pub text: String,
    /// The vector embedding for this chunk's text.
    #[serde(default)]
    pub embedding: Vec<f32>,
    /// Key-value metadata, including the source identifier under [`SOURCE_METADATA_KEY`].
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Chunk {
    /// The source identifier stored in metadata, or [`UNKNOWN`].
    pub fn source_id(&self) -> &str {
        self.metadata.get(SOURCE_METADATA_KEY).map(String::as_str).unwrap_or(UNKNOWN)
    }
}

/// A [`Chunk`] returned by a vector store together with its score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// The score in the backend's native scale.
    pub score: f32,
}

/// One passage retrieved for a query, ready for citation formatting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrievedPassage {
    /// The passage text, passed through verbatim.
    pub content: String,
    /// Colon-delimited source identifier (`path:page[:chunk]`).
    pub source: String,
    /// Similarity or distance value, not normalized.
    pub score: f32,
}

impl RetrievedPassage {
    /// Create a passage from its parts.
    pub fn new(content: impl Into<String>, source: impl Into<String>, score: f32) -> Self {
        Self { content: content.into(), source: source.into(), score }
    }
}

impl From<SearchResult> for RetrievedPassage {
    fn from(result: SearchResult) -> Self {
        let source = result.chunk.source_id().to_string();
        Self { content: result.chunk.text, source, score: result.score }
    }
}
