use anyhow::Result;
use clap::Args;
use console::style;

use super::TargetArgs;
use crate::progress;

#[derive(Args)]
pub struct PingArgs;

pub async fn run(target: &TargetArgs, _args: PingArgs) -> Result<()> {
    let client = target.open_client()?;

    progress::with_spinner("Checking bucket...", client.test_connection()).await?;

    println!(
        "{} bucket reachable (namespace {})",
        style("ok").green().bold(),
        client.keys().namespace()
    );
    Ok(())
}
