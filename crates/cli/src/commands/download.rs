use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use super::{TargetArgs, category};
use crate::progress;

#[derive(Args)]
pub struct DownloadArgs {
    /// Logical path in the bucket
    path: String,

    /// Read from images/ instead of csv/
    #[arg(long)]
    image: bool,

    /// Write to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

pub async fn run(target: &TargetArgs, args: DownloadArgs) -> Result<()> {
    let client = target.open_client()?;

    let data = progress::with_spinner(
        format!("Downloading {}...", args.path),
        client.download(category(args.image), &args.path),
    )
    .await?;

    write_output(&data, args.output).await
}

/// Write to `output`, or to stdout when no file is given.
pub(crate) async fn write_output(data: &[u8], output: Option<PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            tokio::fs::write(&path, data)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            eprintln!("Wrote {} bytes to {}", data.len(), path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(data)?;
            stdout.flush()?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        write_output(b"a,b\n", Some(path.clone())).await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"a,b\n");
    }
}
