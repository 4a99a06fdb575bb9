use citerag_cli::{QueryArgs, run_query};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = QueryArgs::parse();
    args.common.init_logging();
    run_query(&args).await?;
    Ok(())
}
