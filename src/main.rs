// Entrypoint for the CLI application.
// - Keeps `main` small: load `.env`, parse flags, install logging routed
//   around the progress bar and hand over to `cli::run`.
// - Returns `anyhow::Result` so any fatal error prints one diagnostic and
//   exits non-zero.

use album_dump::cli::{self, Args};
use album_dump::ui::{self, BarLogWriter};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // ACCESS_TOKEN may live in a .env file next to the working directory
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("album_dump={level}")));
    // logs share stderr with the progress bar and are drawn around it
    let progress = ui::progress_bar();
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(BarLogWriter::new(progress.clone()))
        .init();

    cli::run(args, progress)
}
