//! # citerag
//!
//! Citation-annotated retrieval-augmented generation.
//!
//! ## Overview
//!
//! This crate answers questions over a document collection held in an
//! external vector store and annotates the answer with its sources. Indexing,
//! embedding, and inference all happen in external services; this crate
//! provides:
//!
//! - [`parse_source_id`] - the one parser for `path:page[:chunk]` identifiers
//! - [`CitationFormatter`] - context assembly and answer decoration in
//!   numbered, inline, or bibliography style
//! - [`RagPipeline`] - embed → search → prompt → generate → cite
//! - [`OllamaClient`] and [`ChromaVectorStore`] - HTTP clients for the
//!   default collaborators
//! - [`setup`] - directory, model-install, and health-check helpers
//!
//! ## Quick Start
//!
//! ```
//! use citerag::{CitationFormatter, RagConfig, RetrievedPassage};
//!
//! let config = RagConfig::default();
//! let formatter = CitationFormatter::new(config.citation.clone());
//! let passages = vec![RetrievedPassage::new("Each player gets $1500.", "data/monopoly.pdf:6:2", 0.3)];
//!
//! let context = formatter.build_context(&passages);
//! assert_eq!(context, "Source 1: monopoly.pdf, Page 6\nContent: Each player gets $1500.");
//! ```

pub mod chroma;
pub mod citation;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod llm;
pub mod ollama;
pub mod pipeline;
pub mod prompt;
pub mod setup;
pub mod source;
pub mod vectorstore;

pub use chroma::ChromaVectorStore;
pub use citation::{CONTEXT_SEPARATOR, CitationFormatter, NO_RESULTS_MESSAGE};
pub use config::{CitationConfig, CitationStyle, RagConfig, RagConfigBuilder};
pub use document::{Chunk, RetrievedPassage, SOURCE_METADATA_KEY, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use llm::LanguageModel;
pub use ollama::OllamaClient;
pub use pipeline::{RagPipeline, RagPipelineBuilder};
pub use prompt::PromptTemplate;
pub use setup::{ModelInstaller, check_ollama_connection};
pub use source::{CitationEntry, SourceInfo, parse_source_id};
pub use vectorstore::VectorStore;
