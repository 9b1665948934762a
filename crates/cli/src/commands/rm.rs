use anyhow::Result;
use clap::Args;
use console::style;
use dialoguer::Confirm;

use super::{TargetArgs, category};

#[derive(Args)]
pub struct RmArgs {
    /// Logical path in the bucket
    path: String,

    /// Remove from images/ instead of csv/
    #[arg(long)]
    image: bool,

    /// Do not ask for confirmation
    #[arg(short, long)]
    yes: bool,
}

pub async fn run(target: &TargetArgs, args: RmArgs) -> Result<()> {
    let client = target.open_client()?;
    let category = category(args.image);
    let key = client.key_for(category, &args.path);

    if !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {key}?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    client.remove_file(category, &args.path).await?;
    println!("{} {key}", style("removed").red().bold());
    Ok(())
}
