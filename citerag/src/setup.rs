//! Environment setup and health checks.
//!
//! These helpers back the `citerag-setup` binary: pulling the models the
//! query path needs, creating working directories, and checking that the
//! Ollama server is reachable.

use std::path::Path;
use std::time::Duration;

use tokio::process::Command;
use tracing::{error, info};

use crate::error::{RagError, Result};

/// How long the health check waits for `GET /api/tags`.
pub const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Return whether `path` exists, logging an error when it does not.
pub fn validate_file_exists(path: impl AsRef<Path>) -> bool {
    let path = path.as_ref();
    if path.exists() {
        return true;
    }
    error!(path = %path.display(), "file not found");
    false
}

/// Return whether the directory `path` exists, optionally creating it.
///
/// # Errors
///
/// Returns [`RagError::Io`] if creation was requested and failed, or if
/// `path` exists but is not a directory.
pub fn validate_directory_exists(path: impl AsRef<Path>, create_if_missing: bool) -> Result<bool> {
    let path = path.as_ref();
    if path.is_dir() {
        return Ok(true);
    }
    if path.exists() {
        return Err(RagError::Io(std::io::Error::new(
            std::io::ErrorKind::AlreadyExists,
            format!("'{}' exists and is not a directory", path.display()),
        )));
    }
    if !create_if_missing {
        error!(path = %path.display(), "directory not found");
        return Ok(false);
    }
    std::fs::create_dir_all(path)?;
    info!(path = %path.display(), "created directory");
    Ok(true)
}

/// Check that an Ollama server answers `GET /api/tags` with HTTP 200.
///
/// Any network error or non-200 status yields `false`; errors are logged,
/// never returned.
pub async fn check_ollama_connection(base_url: &str) -> bool {
    let url = format!("{}/api/tags", base_url.trim_end_matches('/'));
    let client = match reqwest::Client::builder().timeout(HEALTH_CHECK_TIMEOUT).build() {
        Ok(client) => client,
        Err(e) => {
            error!(error = %e, "failed to build HTTP client for health check");
            return false;
        }
    };

    match client.get(&url).send().await {
        Ok(response) if response.status() == reqwest::StatusCode::OK => true,
        Ok(response) => {
            error!(url, status = %response.status(), "Ollama health check failed");
            false
        }
        Err(e) => {
            error!(url, error = %e, "failed to connect to Ollama");
            false
        }
    }
}

/// Installs models by running an external command once per model.
///
/// The default runs `ollama pull <model>`.
#[derive(Debug, Clone)]
pub struct ModelInstaller {
    program: String,
    args: Vec<String>,
}

impl Default for ModelInstaller {
    fn default() -> Self {
        Self::new("ollama", ["pull"])
    }
}

impl ModelInstaller {
    /// Use `program` with leading `args`; the model name is appended last.
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self { program: program.into(), args: args.into_iter().map(Into::into).collect() }
    }

    /// Install each model in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::DependencyInstall`] if the command cannot be
    /// started or exits unsuccessfully.
    pub async fn install<S: AsRef<str>>(&self, models: &[S]) -> Result<()> {
        for model in models {
            let model = model.as_ref();
            info!(program = %self.program, model, "installing model");

            let status = Command::new(&self.program)
                .args(&self.args)
                .arg(model)
                .status()
                .await
                .map_err(|e| {
                    RagError::DependencyInstall(format!("failed to run '{}': {e}", self.program))
                })?;

            if !status.success() {
                return Err(RagError::DependencyInstall(format!(
                    "'{} {} {model}' exited with {status}",
                    self.program,
                    self.args.join(" ")
                )));
            }
        }
        Ok(())
    }
}
