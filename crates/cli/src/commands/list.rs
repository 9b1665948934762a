use anyhow::Result;
use clap::Args;

use super::{TargetArgs, category, format_bytes};

#[derive(Args)]
pub struct ListArgs {
    /// Path prefix to list (a trailing slash limits it to one directory)
    #[arg(default_value = "")]
    prefix: String,

    /// List images/ instead of csv/
    #[arg(long)]
    image: bool,

    /// Print JSON instead of a table
    #[arg(long)]
    json: bool,
}

pub async fn run(target: &TargetArgs, args: ListArgs) -> Result<()> {
    let client = target.open_client()?;
    let files = client.list_files(category(args.image), &args.prefix).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&files)?);
        return Ok(());
    }

    if files.is_empty() {
        println!("No files found.");
        return Ok(());
    }

    println!("{:<20} {:<10} {}", "MODIFIED", "SIZE", "KEY");
    println!("{}", "-".repeat(80));
    for file in &files {
        println!(
            "{:<20} {:<10} {}",
            file.last_modified.format("%Y-%m-%d %H:%M:%S").to_string(),
            format_bytes(file.size),
            file.key,
        );
    }
    Ok(())
}
