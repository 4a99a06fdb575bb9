//! Configuration for the query pipeline and citation formatter.
//!
//! A [`RagConfig`] is an immutable value built once (via
//! [`RagConfig::builder()`] or loaded from TOML) and handed to the
//! components that need it.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::chroma::{DEFAULT_DATABASE, DEFAULT_TENANT};
use crate::error::{RagError, Result};

/// How citations are rendered into the context block and the final answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    /// `Source N: file, Page P` headers and a "Sources Referenced" footer.
    #[default]
    Numbered,
    /// `[N]` markers after each passage and a "References" footer.
    Inline,
    /// `[Source: file, Page: P]` annotations and a de-duplicated source list.
    Bibliography,
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Numbered => "numbered",
            Self::Inline => "inline",
            Self::Bibliography => "bibliography",
        };
        f.write_str(name)
    }
}

impl FromStr for CitationStyle {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "numbered" => Ok(Self::Numbered),
            "inline" => Ok(Self::Inline),
            "bibliography" => Ok(Self::Bibliography),
            other => Err(RagError::ConfigError(format!(
                "unknown citation style '{other}' (expected numbered, inline or bibliography)"
            ))),
        }
    }
}

/// Display options for citations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CitationConfig {
    /// Whether source annotations are added to the context and answer at all.
    pub include_citations: bool,
    /// The rendering style.
    pub style: CitationStyle,
    /// Append the similarity score of every passage to the answer.
    pub show_similarity_scores: bool,
    /// Maximum filename length (in characters) shown in a citation label,
    /// including the `...` that marks a cut.
    pub max_citation_length: usize,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            include_citations: true,
            style: CitationStyle::Numbered,
            show_similarity_scores: false,
            max_citation_length: 50,
        }
    }
}

/// Configuration parameters for retrieval, generation, and citation display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RagConfig {
    /// Directory holding the vector store's persisted data.
    pub chroma_path: PathBuf,
    /// Directory holding the document corpus.
    pub data_path: PathBuf,
    /// Maximum chunk size in characters. Only consumed by ingestion tooling.
    pub chunk_size: usize,
    /// Overlap between consecutive chunks. Only consumed by ingestion tooling.
    pub chunk_overlap: usize,
    /// Number of passages to retrieve per query.
    pub top_k: usize,
    /// Name of the language model used for answers.
    pub model: String,
    /// Name of the embedding model used for queries.
    pub embedding_model: String,
    /// Base URL of the Ollama server.
    pub ollama_url: String,
    /// Base URL of the Chroma server.
    pub chroma_url: String,
    /// Chroma tenant holding the collection.
    pub chroma_tenant: String,
    /// Chroma database holding the collection.
    pub chroma_database: String,
    /// Chroma collection to query.
    pub collection: String,
    /// Citation display options.
    pub citation: CitationConfig,
}

impl Default for RagConfig {
    fn default() -> Self {
        Self {
            chroma_path: PathBuf::from("chroma"),
            data_path: PathBuf::from("data"),
            chunk_size: 800,
            chunk_overlap: 80,
            top_k: 5,
            model: "gpt-oss:20b".to_string(),
            embedding_model: "nomic-embed-text".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            chroma_url: "http://localhost:8000".to_string(),
            chroma_tenant: DEFAULT_TENANT.to_string(),
            chroma_database: DEFAULT_DATABASE.to_string(),
            collection: "langchain".to_string(),
            citation: CitationConfig::default(),
        }
    }
}

impl RagConfig {
    /// Create a new builder for constructing a [`RagConfig`].
    pub fn builder() -> RagConfigBuilder {
        RagConfigBuilder::default()
    }

    /// Parse and validate a configuration from TOML text.
    ///
    /// Missing keys fall back to their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: RagConfig = toml::from_str(text)
            .map_err(|e| RagError::ConfigError(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            RagError::ConfigError(format!("failed to read '{}': {e}", path.display()))
        })?;
        Self::from_toml_str(&text)
    }

    /// Apply `OLLAMA_HOST` and `CHROMA_URL` overrides using the given lookup.
    ///
    /// Pass `|key| std::env::var(key).ok()` to read the process environment.
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("OLLAMA_HOST").filter(|v| !v.trim().is_empty()) {
            self.ollama_url = normalize_url(&url);
        }
        if let Some(url) = lookup("CHROMA_URL").filter(|v| !v.trim().is_empty()) {
            self.chroma_url = normalize_url(&url);
        }
        self
    }

    /// Check that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `chunk_overlap >= chunk_size`
    /// - `top_k == 0`
    /// - `citation.max_citation_length <= 3`
    /// - `model` or `embedding_model` is empty
    /// - `chroma_tenant` or `chroma_database` is empty
    pub fn validate(&self) -> Result<()> {
        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::ConfigError(format!(
                "chunk_overlap ({}) must be less than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.top_k == 0 {
            return Err(RagError::ConfigError("top_k must be greater than zero".to_string()));
        }
        if self.citation.max_citation_length <= 3 {
            return Err(RagError::ConfigError(format!(
                "max_citation_length ({}) must be greater than 3",
                self.citation.max_citation_length
            )));
        }
        if self.model.trim().is_empty() {
            return Err(RagError::ConfigError("model must not be empty".to_string()));
        }
        if self.embedding_model.trim().is_empty() {
            return Err(RagError::ConfigError("embedding_model must not be empty".to_string()));
        }
        if self.chroma_tenant.trim().is_empty() || self.chroma_database.trim().is_empty() {
            return Err(RagError::ConfigError(
                "chroma_tenant and chroma_database must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Ollama accepts `OLLAMA_HOST=host:port` without a scheme.
fn normalize_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

/// Builder for constructing a validated [`RagConfig`].
#[derive(Debug, Clone, Default)]
pub struct RagConfigBuilder {
    config: RagConfig,
}

impl RagConfigBuilder {
    /// Set the vector store directory.
    pub fn chroma_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.chroma_path = path.into();
        self
    }

    /// Set the document corpus directory.
    pub fn data_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_path = path.into();
        self
    }

    /// Set the maximum chunk size in characters.
    pub fn chunk_size(mut self, size: usize) -> Self {
        self.config.chunk_size = size;
        self
    }

    /// Set the overlap between consecutive chunks in characters.
    pub fn chunk_overlap(mut self, overlap: usize) -> Self {
        self.config.chunk_overlap = overlap;
        self
    }

    /// Set the number of passages retrieved per query.
    pub fn top_k(mut self, k: usize) -> Self {
        self.config.top_k = k;
        self
    }

    /// Set the language model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the embedding model name.
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    /// Set the Ollama base URL.
    pub fn ollama_url(mut self, url: impl Into<String>) -> Self {
        self.config.ollama_url = url.into();
        self
    }

    /// Set the Chroma base URL.
    pub fn chroma_url(mut self, url: impl Into<String>) -> Self {
        self.config.chroma_url = url.into();
        self
    }

    /// Set the Chroma tenant.
    pub fn chroma_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.config.chroma_tenant = tenant.into();
        self
    }

    /// Set the Chroma database.
    pub fn chroma_database(mut self, database: impl Into<String>) -> Self {
        self.config.chroma_database = database.into();
        self
    }

    /// Set the Chroma collection name.
    pub fn collection(mut self, name: impl Into<String>) -> Self {
        self.config.collection = name.into();
        self
    }

    /// Enable or disable citations entirely.
    pub fn include_citations(mut self, include: bool) -> Self {
        self.config.citation.include_citations = include;
        self
    }

    /// Set the citation style.
    pub fn citation_style(mut self, style: CitationStyle) -> Self {
        self.config.citation.style = style;
        self
    }

    /// Show per-passage similarity scores in the answer.
    pub fn show_similarity_scores(mut self, show: bool) -> Self {
        self.config.citation.show_similarity_scores = show;
        self
    }

    /// Set the maximum filename length shown in citation labels.
    pub fn max_citation_length(mut self, len: usize) -> Self {
        self.config.citation.max_citation_length = len;
        self
    }

    /// Build the [`RagConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// See [`RagConfig::validate`].
    pub fn build(self) -> Result<RagConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
