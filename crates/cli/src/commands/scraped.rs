use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;
use tracing::info;

use super::TargetArgs;
use super::download::write_output;
use super::upload::file_name;
use crate::progress;

#[derive(Args)]
pub struct ScrapedArgs {
    #[command(subcommand)]
    action: ScrapedAction,
}

#[derive(Subcommand)]
enum ScrapedAction {
    /// Upload a scraper export for a store
    Push {
        /// Store identifier
        store: String,
        /// CSV file to upload
        file: PathBuf,
        /// Object name (defaults to the file name)
        #[arg(long)]
        name: Option<String>,
    },
    /// Fetch the most recent export for a store
    Latest {
        /// Store identifier
        store: String,
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub async fn run(target: &TargetArgs, args: ScrapedArgs) -> Result<()> {
    let client = target.open_client()?;
    match args.action {
        ScrapedAction::Push { store, file, name } => {
            let data = tokio::fs::read(&file)
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            let name = match name {
                Some(name) => name,
                None => file_name(&file)?,
            };

            progress::with_spinner(
                format!("Uploading {name} for {store}..."),
                client.upload_scraped_data(&store, &name, &data),
            )
            .await?;

            println!(
                "{} {}",
                style("uploaded").green().bold(),
                client.scraped_key(&store, &name)
            );
        }
        ScrapedAction::Latest { store, output } => {
            let data = progress::with_spinner(
                format!("Finding latest export for {store}..."),
                client.get_latest_scraped_file(&store),
            )
            .await?;

            info!(store = %store, bytes = data.len(), "Fetched latest export");
            write_output(&data, output).await?;
        }
    }
    Ok(())
}
