// Pagination driver: walks the album window by window, saves the best
// rendition of every photo and, unless this is a dry run, deletes the
// window once all of it is on disk.

use crate::api::PhotoApi;
use crate::config::Config;
use crate::deletion::{delete_window, Sleeper, ThreadSleeper};
use crate::error::{Error, Result};
use crate::select::select_best;
use crate::sink::{file_name_from_url, prepare_destination, AssetSink};
use crate::ui::report;
use indicatif::ProgressBar;
use tracing::{debug, info, warn};

/// Counters for a finished run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub list_calls: usize,
    pub downloaded: usize,
    pub deleted: usize,
}

pub struct Pipeline<'a> {
    config: &'a Config,
    api: &'a dyn PhotoApi,
    sink: &'a dyn AssetSink,
    sleeper: Box<dyn Sleeper + 'a>,
    progress: ProgressBar,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a Config, api: &'a dyn PhotoApi, sink: &'a dyn AssetSink) -> Self {
        Pipeline {
            config,
            api,
            sink,
            sleeper: Box::new(ThreadSleeper),
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_sleeper(mut self, sleeper: impl Sleeper + 'a) -> Self {
        self.sleeper = Box::new(sleeper);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    /// Run until the offset cursor reaches the album total.
    ///
    /// The total is re-read from every window, so deleting photos as they
    /// are saved shrinks it and ends the run. The cursor advances by the
    /// number of photos actually returned. Any list, download or deletion
    /// error aborts the run.
    pub fn run(&mut self) -> Result<RunSummary> {
        let config = self.config;
        let mut summary = RunSummary::default();
        let mut processed: u64 = 0;
        // anything above zero so the first window is always requested
        let mut total: u64 = 1;

        while processed < total {
            let window = self
                .api
                .list(&config.album, config.owner_id, config.window_size, processed)?;
            summary.list_calls += 1;
            total = window.count;
            debug!(offset = processed, total, returned = window.items.len(), "window listed");

            if window.items.is_empty() {
                if processed < total {
                    warn!(
                        offset = processed,
                        total, "empty window before reaching the album total, stopping"
                    );
                }
                break;
            }
            self.progress
                .set_length(summary.downloaded as u64 + total.saturating_sub(processed));

            let dest = prepare_destination(&config.dest)?;
            let count = window.items.len();
            for (i, item) in window.items.iter().enumerate() {
                let variant =
                    select_best(&item.sizes).ok_or(Error::NoVariants { item_id: item.id })?;
                report(
                    &self.progress,
                    format!(
                        "[{}/{}] Downloading photo {} to {}",
                        i + 1,
                        count,
                        variant.url,
                        dest.join(file_name_from_url(&variant.url)).display()
                    ),
                );
                self.sink.save(&variant.url, &dest)?;
                self.progress.inc(1);
                summary.downloaded += 1;
            }
            report(&self.progress, format!("{count} photos have been saved successfully"));

            if !config.dry_run {
                let deleted = delete_window(
                    self.api,
                    &window.items,
                    &config.deletion,
                    &mut *self.sleeper,
                    &self.progress,
                )?;
                summary.deleted += deleted;
                report(&self.progress, format!("{deleted} photos have been deleted successfully"));
            }

            processed += count as u64;
        }

        info!(
            list_calls = summary.list_calls,
            downloaded = summary.downloaded,
            deleted = summary.deleted,
            "album processed"
        );
        Ok(summary)
    }
}
