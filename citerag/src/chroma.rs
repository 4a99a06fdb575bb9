//! Chroma vector store backend.
//!
//! Provides [`ChromaVectorStore`] which implements [`VectorStore`] against a
//! Chroma server's v2 REST API. Collections are addressed by name within a
//! tenant and database; the client resolves the collection id before each
//! query.
//!
//! # Example
//!
//! ```rust,ignore
//! use citerag::{ChromaVectorStore, VectorStore};
//!
//! let store = ChromaVectorStore::new("http://localhost:8000")?;
//! let results = store.search("langchain", &query_embedding, 5).await?;
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

use crate::config::RagConfig;
use crate::document::{Chunk, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// The default Chroma endpoint.
pub const DEFAULT_CHROMA_URL: &str = "http://localhost:8000";

/// The tenant a fresh Chroma server creates.
pub const DEFAULT_TENANT: &str = "default_tenant";

/// The database a fresh Chroma server creates.
pub const DEFAULT_DATABASE: &str = "default_database";

/// A [`VectorStore`] backed by a [Chroma](https://www.trychroma.com/) server.
///
/// Scores are Chroma distances passed through unchanged, so lower values are
/// closer matches. Chroma already returns them nearest first.
#[derive(Debug, Clone)]
pub struct ChromaVectorStore {
    client: reqwest::Client,
    base_url: String,
    tenant: String,
    database: String,
}

impl ChromaVectorStore {
    /// Create a new Chroma vector store connecting to the given URL, using
    /// the default tenant and database.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(RagError::ConfigError("Chroma base URL must not be empty".into()));
        }
        let client = reqwest::Client::builder().build().map_err(Self::map_err)?;
        Ok(Self {
            client,
            base_url,
            tenant: DEFAULT_TENANT.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        })
    }

    /// Create a new Chroma vector store with the default URL.
    pub fn default_url() -> Result<Self> {
        Self::new(DEFAULT_CHROMA_URL)
    }

    /// Create a store from the URL, tenant, and database in a [`RagConfig`].
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Ok(Self::new(&config.chroma_url)?
            .with_database(&config.chroma_tenant, &config.chroma_database))
    }

    /// Address collections in the given tenant and database.
    pub fn with_database(mut self, tenant: impl Into<String>, database: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self.database = database.into();
        self
    }

    fn collections_url(&self) -> String {
        format!(
            "{}/api/v2/tenants/{}/databases/{}/collections",
            self.base_url, self.tenant, self.database
        )
    }

    fn map_err(e: reqwest::Error) -> RagError {
        RagError::VectorStoreError { backend: "chroma".to_string(), message: e.to_string() }
    }

    async fn collection_id(&self, name: &str) -> Result<String> {
        let url = format!("{}/{name}", self.collections_url());
        let response = self.client.get(&url).send().await.map_err(Self::map_err)?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(RagError::VectorStoreError {
                backend: "chroma".to_string(),
                message: format!("collection '{name}' lookup returned {status}"),
            });
        }
        let collection: CollectionResponse = response.json().await.map_err(Self::map_err)?;
        Ok(collection.id)
    }
}

// ── Chroma API request/response types ──────────────────────────────

#[derive(Deserialize)]
struct CollectionResponse {
    id: String,
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query_embeddings: Vec<&'a [f32]>,
    n_results: usize,
    include: [&'static str; 3],
}

#[derive(Deserialize)]
struct QueryResponse {
    ids: Vec<Vec<String>>,
    #[serde(default)]
    documents: Option<Vec<Vec<Option<String>>>>,
    #[serde(default)]
    metadatas: Option<Vec<Vec<Option<HashMap<String, Value>>>>>,
    #[serde(default)]
    distances: Option<Vec<Vec<f32>>>,
}

impl QueryResponse {
    /// Flatten the first (and only) query's columns into search results.
    fn into_results(self) -> Vec<SearchResult> {
        let ids = self.ids.into_iter().next().unwrap_or_default();
        let mut documents =
            self.documents.and_then(|d| d.into_iter().next()).unwrap_or_default().into_iter();
        let mut metadatas =
            self.metadatas.and_then(|m| m.into_iter().next()).unwrap_or_default().into_iter();
        let mut distances =
            self.distances.and_then(|d| d.into_iter().next()).unwrap_or_default().into_iter();

        ids.into_iter()
            .map(|id| {
                let text = documents.next().flatten().unwrap_or_default();
                let metadata = metadatas
                    .next()
                    .flatten()
                    .unwrap_or_default()
                    .into_iter()
                    .map(|(k, v)| (k, metadata_string(v)))
                    .collect();
                let score = distances.next().unwrap_or(0.0);
                SearchResult { chunk: Chunk { id, text, embedding: Vec::new(), metadata }, score }
            })
            .collect()
    }
}

fn metadata_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

#[async_trait]
impl VectorStore for ChromaVectorStore {
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        top_k: usize,
    ) -> Result<Vec<SearchResult>> {
        let id = self.collection_id(collection).await?;
        debug!(collection, collection_id = %id, top_k, "querying chroma");

        let request = QueryRequest {
            query_embeddings: vec![embedding],
            n_results: top_k,
            include: ["documents", "metadatas", "distances"],
        };
        let url = format!("{}/{id}/query", self.collections_url());
        let response =
            self.client.post(&url).json(&request).send().await.map_err(Self::map_err)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!(collection, %status, "chroma query failed");
            return Err(RagError::VectorStoreError {
                backend: "chroma".to_string(),
                message: format!("query returned {status}: {body}"),
            });
        }

        let parsed: QueryResponse = response.json().await.map_err(Self::map_err)?;
        Ok(parsed.into_results())
    }
}
