//! End-to-end tests for the query pipeline with in-process collaborators.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use citerag::{
    CitationStyle, Chunk, EmbeddingProvider, InMemoryVectorStore, LanguageModel,
    NO_RESULTS_MESSAGE, RagConfig, RagError, RagPipeline, SearchResult, VectorStore,
};
use tokio::sync::Mutex;

/// Embeds every query as the same unit vector.
struct FixedEmbedding;

#[async_trait]
impl EmbeddingProvider for FixedEmbedding {
    async fn embed(&self, _text: &str) -> citerag::Result<Vec<f32>> {
        Ok(vec![1.0, 0.0, 0.0])
    }
}

/// Records prompts and replies with a canned answer.
#[derive(Default)]
struct RecordingModel {
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

#[async_trait]
impl LanguageModel for RecordingModel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn generate(&self, prompt: &str) -> citerag::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.to_string());
        Ok("Each player starts with $1500 [1].".to_string())
    }
}

struct FailingModel;

#[async_trait]
impl LanguageModel for FailingModel {
    fn name(&self) -> &str {
        "failing"
    }

    async fn generate(&self, _prompt: &str) -> citerag::Result<String> {
        Err(RagError::ModelError { model: "failing".into(), message: "connection refused".into() })
    }
}

/// Returns a fixed result list, like a distance-scored backend would.
struct StaticStore(Vec<SearchResult>);

#[async_trait]
impl VectorStore for StaticStore {
    async fn search(
        &self,
        _collection: &str,
        _embedding: &[f32],
        top_k: usize,
    ) -> citerag::Result<Vec<SearchResult>> {
        Ok(self.0.iter().take(top_k).cloned().collect())
    }
}

fn chunk(source: &str, text: &str, embedding: Vec<f32>) -> Chunk {
    Chunk {
        id: source.to_string(),
        text: text.to_string(),
        embedding,
        metadata: HashMap::from([("id".to_string(), source.to_string())]),
    }
}

async fn monopoly_store() -> Arc<InMemoryVectorStore> {
    let store = InMemoryVectorStore::new();
    store
        .insert(
            "langchain",
            vec![
                chunk("data/monopoly.pdf:6:2", "Each player is given $1500.", vec![1.0, 0.1, 0.0]),
                chunk("data/monopoly.pdf:2:0", "Roll the dice to move.", vec![0.5, 0.5, 0.0]),
                chunk("data/ticket_to_ride.pdf:1:0", "Collect train cards.", vec![0.0, 0.0, 1.0]),
            ],
        )
        .await;
    Arc::new(store)
}

fn pipeline(
    config: RagConfig,
    store: Arc<dyn VectorStore>,
    model: Arc<dyn LanguageModel>,
) -> RagPipeline {
    RagPipeline::builder()
        .config(config)
        .embedding_provider(Arc::new(FixedEmbedding))
        .vector_store(store)
        .language_model(model)
        .build()
        .unwrap()
}

#[tokio::test]
async fn empty_retrieval_skips_the_model() {
    let store = InMemoryVectorStore::new();
    store.insert("langchain", Vec::new()).await;
    let model = Arc::new(RecordingModel::default());

    let pipeline = pipeline(RagConfig::default(), Arc::new(store), model.clone());
    let answer = pipeline.query("anything?").await.unwrap();

    assert_eq!(answer, NO_RESULTS_MESSAGE);
    assert_eq!(answer, "No relevant documents found.");
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn numbered_answer_cites_retrieved_sources() {
    let model = Arc::new(RecordingModel::default());
    let config = RagConfig::builder().top_k(2).build().unwrap();
    let pipeline = pipeline(config, monopoly_store().await, model.clone());

    let answer = pipeline.query("How much money does a player start with?").await.unwrap();

    assert_eq!(
        answer,
        "Answer: Each player starts with $1500 [1].\n\n\
         Sources Referenced:\n\
         Source 1: monopoly.pdf (Page 6)\n\
         Source 2: monopoly.pdf (Page 2)"
    );

    let prompts = model.prompts.lock().await;
    assert_eq!(prompts.len(), 1);
    let prompt = &prompts[0];
    assert!(prompt.contains("Source 1: monopoly.pdf, Page 6\nContent: Each player is given $1500."));
    assert!(prompt.contains("Source 2: monopoly.pdf, Page 2\nContent: Roll the dice to move."));
    assert!(!prompt.contains("Collect train cards."));
    assert!(prompt.contains("Question: How much money does a player start with?"));
}

#[tokio::test]
async fn retrieval_order_is_kept_for_distance_scores() {
    // Distances ascend: the backend already put the closest match first.
    let results = vec![
        SearchResult { chunk: chunk("a.pdf:1:0", "alpha", vec![]), score: 0.1 },
        SearchResult { chunk: chunk("a.pdf:1:1", "beta", vec![]), score: 0.2 },
        SearchResult { chunk: chunk("b.pdf:4:0", "gamma", vec![]), score: 0.3 },
    ];
    let model = Arc::new(RecordingModel::default());
    let config = RagConfig::builder()
        .citation_style(CitationStyle::Inline)
        .show_similarity_scores(true)
        .build()
        .unwrap();
    let pipeline = pipeline(config, Arc::new(StaticStore(results)), model.clone());

    let passages = pipeline.retrieve("q").await.unwrap();
    let sources: Vec<&str> = passages.iter().map(|p| p.source.as_str()).collect();
    assert_eq!(sources, vec!["a.pdf:1:0", "a.pdf:1:1", "b.pdf:4:0"]);

    let answer = pipeline.query("q").await.unwrap();
    assert!(answer.ends_with(
        "References:\n[1] a.pdf, Page 1\n[2] a.pdf, Page 1\n[3] b.pdf, Page 4\n\n\
         Similarity Scores: [0.100, 0.200, 0.300]"
    ));

    let prompts = model.prompts.lock().await;
    assert!(prompts[0].contains("alpha [1]\n\nbeta [2]\n\ngamma [3]"));
}

#[tokio::test]
async fn model_failure_propagates() {
    let pipeline = pipeline(RagConfig::default(), monopoly_store().await, Arc::new(FailingModel));
    let err = pipeline.query("q").await.unwrap_err();
    assert!(matches!(err, RagError::ModelError { .. }));
}

#[tokio::test]
async fn missing_collection_is_a_pipeline_error() {
    let model = Arc::new(RecordingModel::default());
    let config = RagConfig::builder().collection("absent").build().unwrap();
    let pipeline = pipeline(config, monopoly_store().await, model.clone());

    let err = pipeline.query("q").await.unwrap_err();
    assert!(matches!(err, RagError::PipelineError(msg) if msg.contains("absent")));
    assert_eq!(model.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn builder_requires_every_collaborator() {
    let err = RagPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(Arc::new(FixedEmbedding))
        .language_model(Arc::new(FailingModel))
        .build()
        .err()
        .unwrap();
    assert!(matches!(err, RagError::ConfigError(msg) if msg.contains("vector_store")));
}
