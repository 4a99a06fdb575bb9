use std::process::ExitCode;

use citerag::ModelInstaller;
use citerag_cli::{SetupArgs, finish_setup, run_setup};
use clap::Parser;

#[tokio::main]
async fn main() -> ExitCode {
    let args = SetupArgs::parse();
    args.common.init_logging();

    let config = match args.common.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Setup failed: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let installer = ModelInstaller::default();
    let installer = (!args.skip_install).then_some(&installer);

    let result = run_setup(&config, installer).await;
    ExitCode::from(finish_setup(&config, &result))
}
