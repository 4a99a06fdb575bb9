//! The setup flow: install models, create directories, check connectivity.

use citerag::setup::{check_ollama_connection, validate_directory_exists};
use citerag::{ModelInstaller, RagConfig, Result};
use tracing::warn;

/// What the setup flow found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupReport {
    /// Whether models were pulled during this run.
    pub models_installed: bool,
    /// Whether the Ollama server answered the health check.
    pub ollama_reachable: bool,
}

/// Run the setup steps in order.
///
/// Pass `None` as the installer to skip pulling models. An unreachable
/// Ollama server is reported in the [`SetupReport`], not as an error.
///
/// # Errors
///
/// Returns [`citerag::RagError::DependencyInstall`] if a model cannot be
/// pulled, or [`citerag::RagError::Io`] if a directory cannot be created.
pub async fn run_setup(config: &RagConfig, installer: Option<&ModelInstaller>) -> Result<SetupReport> {
    let models_installed = match installer {
        Some(installer) => {
            println!("Installing models...");
            installer.install(&[&config.model, &config.embedding_model]).await?;
            println!("Models installed: {}, {}", config.model, config.embedding_model);
            true
        }
        None => false,
    };

    println!("Setting up directories...");
    validate_directory_exists(&config.data_path, true)?;
    validate_directory_exists(&config.chroma_path, true)?;
    println!("Directories ready: {}, {}", config.data_path.display(), config.chroma_path.display());

    println!("Checking Ollama at {}...", config.ollama_url);
    let ollama_reachable = check_ollama_connection(&config.ollama_url).await;
    if ollama_reachable {
        println!("Ollama is running");
    } else {
        warn!(url = %config.ollama_url, "Ollama is not reachable");
        println!("Ollama is not running. Install it from https://ollama.com, start it, then run:");
        println!("   ollama pull {}", config.model);
        println!("   ollama pull {}", config.embedding_model);
    }

    Ok(SetupReport { models_installed, ollama_reachable })
}

/// Print the outcome of [`run_setup`] and return the process exit status:
/// 0 on success, 1 when a step failed.
pub fn finish_setup(config: &RagConfig, result: &Result<SetupReport>) -> u8 {
    match result {
        Ok(_) => {
            println!("\nSetup complete!");
            println!("\nNext steps:");
            println!("1. Add PDF files to the '{}' directory", config.data_path.display());
            println!("2. Index them into the '{}' Chroma collection", config.collection);
            println!("3. Run: citerag-query \"Your question here\"");
            0
        }
        Err(e) => {
            eprintln!("Setup failed: {e}");
            1
        }
    }
}
