//! # citerag-cli
//!
//! Command-line front ends for `citerag`:
//!
//! - `citerag-query <query_text>` prints a cited answer
//! - `citerag-setup` pulls models, creates directories, and checks Ollama
//!
//! The binaries are thin wrappers over [`run_query`] and [`run_setup`] so
//! that the same flows can be driven programmatically.

pub mod args;
pub mod query;
pub mod setup;

pub use args::{CommonArgs, QueryArgs, SetupArgs};
pub use query::{build_pipeline, run_query};
pub use setup::{SetupReport, finish_setup, run_setup};
