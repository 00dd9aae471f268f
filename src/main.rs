use crate::server::launch;
use anyhow::Result;
use clap::Parser;

mod arxiv;
mod cli;
mod config;
mod llm;
mod pipeline;
mod server;
mod types;

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();
    let config = args.into_config();

    launch(config).await
}
