//! Ollama client for query embeddings and answer generation.
//!
//! Talks to a local Ollama server over its REST API:
//! - `POST /api/embeddings` for query embeddings
//! - `POST /api/generate` (non-streaming) for completions
//! - `GET /api/tags` as a health check

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::config::RagConfig;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::llm::LanguageModel;
use crate::setup::check_ollama_connection;

/// The default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = "http://localhost:11434";

/// An [`EmbeddingProvider`] and [`LanguageModel`] backed by Ollama.
///
/// # Example
///
/// ```rust,ignore
/// use citerag::{LanguageModel, OllamaClient};
///
/// let client = OllamaClient::new("http://localhost:11434", "mistral", "nomic-embed-text")?;
/// let answer = client.generate("Why is the sky blue?").await?;
/// ```
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
    embedding_model: String,
}

impl OllamaClient {
    /// Create a client for the given server, chat model, and embedding model.
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        embedding_model: impl Into<String>,
    ) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(RagError::ConfigError("Ollama base URL must not be empty".into()));
        }
        let client = reqwest::Client::builder().build().map_err(|e| RagError::Connectivity {
            endpoint: base_url.clone(),
            message: format!("failed to build HTTP client: {e}"),
        })?;

        Ok(Self { client, base_url, model: model.into(), embedding_model: embedding_model.into() })
    }

    /// Create a client from the URL and model names in a [`RagConfig`].
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        Self::new(&config.ollama_url, &config.model, &config.embedding_model)
    }

    /// The server base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The embedding model name.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Whether the server answers `GET /api/tags` with HTTP 200.
    pub async fn health_check(&self) -> bool {
        check_ollama_connection(&self.base_url).await
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> std::result::Result<Resp, String>
    where
        Req: Serialize + ?Sized,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| format!("request to {path} failed: {e}"))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let detail =
                serde_json::from_str::<ErrorResponse>(&body).map(|e| e.error).unwrap_or(body);
            return Err(format!("{path} returned {status}: {detail}"));
        }

        response.json().await.map_err(|e| format!("failed to parse {path} response: {e}"))
    }
}

// ── Ollama API request/response types ──────────────────────────────

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Deserialize)]
struct ErrorResponse {
    error: String,
}

// ── Trait implementations ──────────────────────────────────────────

#[async_trait]
impl EmbeddingProvider for OllamaClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        debug!(
            provider = "Ollama",
            model = %self.embedding_model,
            text_len = text.len(),
            "embedding text"
        );

        let request = EmbeddingRequest { model: &self.embedding_model, prompt: text };
        let response: EmbeddingResponse =
            self.post_json("/api/embeddings", &request).await.map_err(|message| {
                error!(provider = "Ollama", error = %message, "embedding failed");
                RagError::EmbeddingError { provider: "Ollama".into(), message }
            })?;

        if response.embedding.is_empty() {
            return Err(RagError::EmbeddingError {
                provider: "Ollama".into(),
                message: format!("model '{}' returned an empty embedding", self.embedding_model),
            });
        }
        Ok(response.embedding)
    }
}

#[async_trait]
impl LanguageModel for OllamaClient {
    fn name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!(model = %self.model, prompt_len = prompt.len(), "generating completion");

        let request = GenerateRequest { model: &self.model, prompt, stream: false };
        let response: GenerateResponse =
            self.post_json("/api/generate", &request).await.map_err(|message| {
                error!(model = %self.model, error = %message, "generation failed");
                RagError::ModelError { model: self.model.clone(), message }
            })?;

        Ok(response.response)
    }
}
