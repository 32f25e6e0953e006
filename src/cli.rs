use crate::api::{ApiClient, DEFAULT_API_URL, DEFAULT_API_VERSION};
use crate::config::{Config, DEFAULT_OWNER_ID, DEFAULT_WINDOW_SIZE, MAX_WINDOW_SIZE};
use crate::pipeline::Pipeline;
use crate::sink::HttpSink;
use crate::ui;
use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use indicatif::ProgressBar;
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "album-dump",
    about = "Save every photo of a VK album at full resolution",
    version
)]
pub struct Args {
    /// VK album name
    #[arg(long, default_value = "saved")]
    pub album: String,

    /// Destination folder for saved photos
    #[arg(long, default_value = ".")]
    pub dest: PathBuf,

    /// If false deletes photos after save
    #[arg(
        long = "dry-run",
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = true,
        default_missing_value = "true"
    )]
    pub dry_run: bool,

    /// Batch size of photos processed in one step
    #[arg(
        long,
        default_value_t = DEFAULT_WINDOW_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_WINDOW_SIZE as i64)
    )]
    pub count: u32,

    /// Owner of the album (negative for communities)
    #[arg(long, env = "OWNER_ID", default_value_t = DEFAULT_OWNER_ID, allow_negative_numbers = true)]
    pub owner: i64,

    /// vk.com access token
    #[arg(long = "access-token", env = "ACCESS_TOKEN", hide_env_values = true)]
    pub access_token: Option<String>,

    /// Base URL of the VK method endpoint
    #[arg(long = "api-url", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// VK API version sent with every request
    #[arg(long = "api-version", default_value = DEFAULT_API_VERSION)]
    pub api_version: String,

    /// Do not ask for confirmation before deleting
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Debug logging
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// `progress` is the bar the log writer was built around, so log records
/// and progress lines share one terminal region.
pub fn run(args: Args, progress: ProgressBar) -> Result<()> {
    let config = Config::from_args(&args)?;
    info!(album = %config.album, owner = config.owner_id, dry_run = config.dry_run, "starting");

    if !config.dry_run && !args.yes && !ui::confirm_deletion(&config.album)? {
        println!("Aborted, nothing was saved or deleted.");
        return Ok(());
    }

    let api = ApiClient::from_config(&config)?;
    let sink = HttpSink::new(api.http().clone());

    let summary = Pipeline::new(&config, &api, &sink)
        .with_progress(progress.clone())
        .run()
        .with_context(|| format!("processing album '{}' failed", config.album))?;
    progress.finish_and_clear();

    println!(
        "Done: {} photos saved, {} deleted ({} pages listed)",
        summary.downloaded, summary.deleted, summary.list_calls
    );
    Ok(())
}
