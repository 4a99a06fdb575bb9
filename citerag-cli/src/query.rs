//! The query flow: configuration → pipeline → cited answer.

use std::sync::Arc;

use anyhow::Context;
use citerag::{ChromaVectorStore, OllamaClient, RagConfig, RagPipeline};
use tracing::info;

use crate::args::QueryArgs;

/// Build a pipeline wired to Ollama (embeddings and answers) and Chroma
/// (retrieval) as configured.
pub fn build_pipeline(config: RagConfig) -> anyhow::Result<RagPipeline> {
    let ollama = Arc::new(OllamaClient::from_config(&config)?);
    let chroma = Arc::new(ChromaVectorStore::from_config(&config)?);

    let pipeline = RagPipeline::builder()
        .embedding_provider(ollama.clone())
        .language_model(ollama)
        .vector_store(chroma)
        .config(config)
        .build()?;
    Ok(pipeline)
}

/// Answer `args.query_text`, print the result to stdout, and return it.
///
/// Failures reaching Ollama or Chroma are returned, not retried.
pub async fn run_query(args: &QueryArgs) -> anyhow::Result<String> {
    let config = args.apply(args.common.load_config()?)?;
    info!(
        model = %config.model,
        collection = %config.collection,
        top_k = config.top_k,
        "running query"
    );

    let pipeline = build_pipeline(config)?;
    let answer = pipeline.query(&args.query_text).await.context("query failed")?;
    println!("{answer}");
    Ok(answer)
}
