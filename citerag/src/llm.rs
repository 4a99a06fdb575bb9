//! Language model trait for single-shot text completion.

use async_trait::async_trait;

use crate::error::Result;

/// A language model that turns a prompt into a single completion.
///
/// Streaming is not needed: the query path waits for the whole answer before
/// decorating it with citations.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// The model identifier, used in logs and errors.
    fn name(&self) -> &str;

    /// Generate a completion for `prompt`.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
