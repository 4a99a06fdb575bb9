//! Command-line arguments for the query and setup binaries.

use std::path::PathBuf;

use anyhow::Context;
use citerag::{CitationStyle, RagConfig};
use clap::Parser;

/// Answer a question from the indexed documents, with source citations.
#[derive(Debug, Parser)]
#[command(name = "citerag-query", version, about)]
pub struct QueryArgs {
    /// The query text.
    pub query_text: String,

    #[command(flatten)]
    pub common: CommonArgs,

    /// Citation style: numbered, inline or bibliography.
    #[arg(long)]
    pub style: Option<CitationStyle>,

    /// Number of passages to retrieve.
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Append similarity scores to the answer.
    #[arg(long)]
    pub show_scores: bool,

    /// Print the model's answer without any source annotations.
    #[arg(long, conflicts_with_all = ["style", "show_scores"])]
    pub no_citations: bool,
}

/// Pull the models, create working directories, and check the model server.
#[derive(Debug, Parser)]
#[command(name = "citerag-setup", version, about)]
pub struct SetupArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Skip pulling models with `ollama pull`.
    #[arg(long)]
    pub skip_install: bool,
}

/// Options shared by both binaries.
#[derive(Debug, Clone, clap::Args)]
pub struct CommonArgs {
    /// TOML configuration file. Defaults apply when omitted.
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[arg(long)]
    pub json_logs: bool,
}

impl CommonArgs {
    /// Load the configuration file (or defaults) and apply environment overrides.
    pub fn load_config(&self) -> anyhow::Result<RagConfig> {
        let config = match &self.config {
            Some(path) => RagConfig::from_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => RagConfig::default(),
        };
        Ok(config.with_env_overrides(|key| std::env::var(key).ok()))
    }

    /// Install the global log subscriber.
    pub fn init_logging(&self) {
        let result = if self.json_logs {
            citerag_telemetry::init_json(&self.log_level)
        } else {
            citerag_telemetry::init_telemetry(&self.log_level)
        };
        if let Err(e) = result {
            eprintln!("warning: logging not initialised: {e}");
        }
    }
}

impl QueryArgs {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply(&self, mut config: RagConfig) -> anyhow::Result<RagConfig> {
        if let Some(style) = self.style {
            config.citation.style = style;
        }
        if let Some(k) = self.top_k {
            config.top_k = k;
        }
        if self.show_scores {
            config.citation.show_similarity_scores = true;
        }
        if self.no_citations {
            config.citation.include_citations = false;
        }
        config.validate().context("invalid command-line options")?;
        Ok(config)
    }
}
