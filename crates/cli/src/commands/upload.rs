use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use console::style;

use bucketscope_core::Category;

use super::{TargetArgs, category};
use crate::progress;

#[derive(Args)]
pub struct UploadArgs {
    /// Local file to upload
    file: PathBuf,

    /// Logical path in the bucket (defaults to the file name)
    #[arg(long = "as")]
    path: Option<String>,

    /// Store under images/ instead of csv/
    #[arg(long)]
    image: bool,

    /// Content type for images (guessed from the extension if omitted)
    #[arg(long, requires = "image")]
    content_type: Option<String>,
}

pub async fn run(target: &TargetArgs, args: UploadArgs) -> Result<()> {
    let client = target.open_client()?;
    let data = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let path = match args.path {
        Some(path) => path,
        None => file_name(&args.file)?,
    };
    let category = category(args.image);

    let content_type = match category {
        Category::Csv => None,
        Category::Images => Some(
            args.content_type
                .unwrap_or_else(|| guess_image_type(&args.file).to_string()),
        ),
    };

    progress::with_spinner(format!("Uploading {path}..."), async {
        match &content_type {
            Some(content_type) => client.upload_image(&path, &data, content_type).await,
            None => client.upload_csv(&path, &data).await,
        }
    })
    .await?;

    println!(
        "{} {}",
        style("uploaded").green().bold(),
        client.key_for(category, &path)
    );
    Ok(())
}

pub(crate) fn file_name(path: &Path) -> Result<String> {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .with_context(|| format!("cannot derive an object name from {}", path.display()))
}

fn guess_image_type(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "avif" => "image/avif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guesses_common_image_types() {
        assert_eq!(guess_image_type(Path::new("a/b/logo.PNG")), "image/png");
        assert_eq!(guess_image_type(Path::new("photo.jpeg")), "image/jpeg");
        assert_eq!(guess_image_type(Path::new("noext")), "application/octet-stream");
    }

    #[test]
    fn object_name_defaults_to_file_name() {
        assert_eq!(file_name(Path::new("/tmp/exports/prices.csv")).unwrap(), "prices.csv");
        assert!(file_name(Path::new("/")).is_err());
    }
}
