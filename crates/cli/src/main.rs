mod commands;
mod config;
mod progress;

use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "bucketscope",
    version,
    about = "Environment-scoped CSV and image storage on S3-compatible buckets"
)]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,

    #[command(flatten)]
    target: commands::TargetArgs,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        commands::Command::Init(args) => commands::init::run(args).await,
        commands::Command::Ping(args) => commands::ping::run(&cli.target, args).await,
        commands::Command::Upload(args) => commands::upload::run(&cli.target, args).await,
        commands::Command::Download(args) => commands::download::run(&cli.target, args).await,
        commands::Command::List(args) => commands::list::run(&cli.target, args).await,
        commands::Command::Rm(args) => commands::rm::run(&cli.target, args).await,
        commands::Command::Scraped(args) => commands::scraped::run(&cli.target, args).await,
    }
}
