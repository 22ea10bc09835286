mod audio;
mod config;
mod history;
mod pipeline;
mod script;
mod topics;
mod trends;
mod uploader;
mod video;
mod visuals;

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "trendtoons",
    about = "Generate and upload cartoon comedy shorts from trending topics"
)]
struct Args {
    /// Path to the configuration JSON file
    #[clap(long, default_value = "config.json")]
    config: PathBuf,

    /// Override the automatically selected trending topic (forces a single video)
    #[clap(long)]
    topic: Option<String>,

    /// Generate the video(s) but skip uploading
    #[clap(long)]
    dry_run: bool,

    /// Number of videos to generate and upload during this run
    #[clap(long)]
    count: Option<i64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("info") // set to "debug" for more logs
        .init();

    let args = Args::parse();
    let settings = config::load_settings(&args.config)?;

    let trends = trends::GoogleTrends::new();
    let renderer = pipeline::CartoonRenderer;
    let host = uploader::YouTube::new();

    let produced = pipeline::run(
        &settings,
        &trends,
        &renderer,
        &host,
        args.topic.as_deref(),
        args.dry_run,
        args.count,
    )
    .await?;

    info!("Run complete; produced {} video(s)", produced.len());
    for path in &produced {
        info!("  {}", path.display());
    }
    Ok(())
}
