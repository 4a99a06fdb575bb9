//! Query pipeline orchestrator.
//!
//! The [`RagPipeline`] answers one question at a time by composing an
//! [`EmbeddingProvider`], a [`VectorStore`], and a [`LanguageModel`] around
//! the [`CitationFormatter`].
//!
//! # Example
//!
//! ```rust,ignore
//! use citerag::{ChromaVectorStore, OllamaClient, RagConfig, RagPipeline};
//!
//! let config = RagConfig::default();
//! let ollama = Arc::new(OllamaClient::from_config(&config)?);
//! let pipeline = RagPipeline::builder()
//!     .config(config)
//!     .embedding_provider(ollama.clone())
//!     .vector_store(Arc::new(ChromaVectorStore::default_url()?))
//!     .language_model(ollama)
//!     .build()?;
//!
//! let answer = pipeline.query("How much money does each player start with?").await?;
//! ```

use std::sync::Arc;

use tracing::{error, info};

use crate::citation::{CitationFormatter, NO_RESULTS_MESSAGE};
use crate::config::RagConfig;
use crate::document::RetrievedPassage;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::llm::LanguageModel;
use crate::vectorstore::VectorStore;

/// The query pipeline orchestrator.
///
/// Executes embed → search → format context → generate → format answer.
/// Construct one via [`RagPipeline::builder()`].
pub struct RagPipeline {
    config: RagConfig,
    formatter: CitationFormatter,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    language_model: Arc<dyn LanguageModel>,
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the citation formatter.
    pub fn formatter(&self) -> &CitationFormatter {
        &self.formatter
    }

    /// Retrieve the passages for `query`, most relevant first.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if embedding or search fails.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<RetrievedPassage>> {
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::PipelineError(format!("query embedding failed: {e}"))
        })?;

        let collection = self.config.collection.as_str();
        let results = self
            .vector_store
            .search(collection, &query_embedding, self.config.top_k)
            .await
            .map_err(|e| {
                error!(collection, error = %e, "vector store search failed");
                RagError::PipelineError(format!("search failed in collection '{collection}': {e}"))
            })?;

        Ok(results.into_iter().map(RetrievedPassage::from).collect())
    }

    /// Answer `query` with citations.
    ///
    /// When retrieval finds nothing, returns [`NO_RESULTS_MESSAGE`] without
    /// calling the language model.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::PipelineError`] if retrieval fails, or the model's
    /// error if generation fails.
    pub async fn query(&self, query: &str) -> Result<String> {
        let passages = self.retrieve(query).await?;
        if passages.is_empty() {
            info!(result_count = 0, "no passages retrieved");
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }
        self.answer(query, &passages).await
    }

    /// Generate a cited answer for `query` from already retrieved passages.
    ///
    /// # Errors
    ///
    /// Returns the model's error if generation fails.
    pub async fn answer(&self, query: &str, passages: &[RetrievedPassage]) -> Result<String> {
        if passages.is_empty() {
            return Ok(NO_RESULTS_MESSAGE.to_string());
        }

        let context = self.formatter.build_context(passages);
        let prompt = self.formatter.prompt_template().render(&context, query);

        let response = self.language_model.generate(&prompt).await.inspect_err(|e| {
            error!(model = self.language_model.name(), error = %e, "generation failed");
        })?;

        info!(
            result_count = passages.len(),
            style = %self.formatter.config().style,
            "query completed"
        );

        Ok(self.formatter.build_answer(&response, passages))
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// All fields are required. Call [`build()`](RagPipelineBuilder::build)
/// to validate and produce the pipeline.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    language_model: Option<Arc<dyn LanguageModel>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the language model.
    pub fn language_model(mut self, model: Arc<dyn LanguageModel>) -> Self {
        self.language_model = Some(model);
        self
    }

    /// Build the [`RagPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if any required field is missing or
    /// the configuration is invalid.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::ConfigError("config is required".to_string()))?;
        config.validate()?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::ConfigError("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::ConfigError("vector_store is required".to_string()))?;
        let language_model = self
            .language_model
            .ok_or_else(|| RagError::ConfigError("language_model is required".to_string()))?;

        Ok(RagPipeline {
            formatter: CitationFormatter::new(config.citation.clone()),
            config,
            embedding_provider,
            vector_store,
            language_model,
        })
    }
}
