// UI layer: terminal output for a run. Progress goes through an indicatif
// bar and the only interactive step is a dialoguer confirmation before a
// destructive run.

use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, IsTerminal, Write};
use tracing_subscriber::fmt::MakeWriter;

/// Bar counting saved photos. Its length is adjusted by the pipeline as
/// the album total becomes known.
pub fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::new(0);
    let style = ProgressStyle::with_template("{spinner} [{pos}/{len}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message("saving photos");
    pb
}

/// Print a progress line above the bar, or straight to stdout when the bar
/// is hidden (not a terminal, or tests) since indicatif drops those lines.
pub fn report(progress: &ProgressBar, line: impl AsRef<str>) {
    if progress.is_hidden() {
        println!("{}", line.as_ref());
    } else {
        progress.println(line);
    }
}

/// Log sink for the tracing subscriber. Each record is written to stderr
/// with the bar suspended, so backoff warnings do not tear the bar.
#[derive(Clone)]
pub struct BarLogWriter {
    progress: ProgressBar,
}

impl BarLogWriter {
    pub fn new(progress: ProgressBar) -> Self {
        BarLogWriter { progress }
    }
}

impl Write for BarLogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.progress.suspend(|| io::stderr().write(buf))
    }

    fn flush(&mut self) -> io::Result<()> {
        self.progress.suspend(|| io::stderr().flush())
    }
}

impl<'a> MakeWriter<'a> for BarLogWriter {
    type Writer = BarLogWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Ask before deleting photos from `album`. Non-interactive runs are taken
/// as already confirmed.
pub fn confirm_deletion(album: &str) -> std::io::Result<bool> {
    if !std::io::stdin().is_terminal() {
        return Ok(true);
    }
    Confirm::new()
        .with_prompt(format!(
            "Photos of album '{album}' will be deleted from VK after saving. Continue?"
        ))
        .default(false)
        .interact()
}
