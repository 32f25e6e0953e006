// Download sink: where the selected rendition of each photo ends up on disk.

use crate::error::{Error, Result};
use reqwest::blocking::Client;
use std::fs::{self, File};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Persists a remote asset into a local directory.
pub trait AssetSink {
    /// Save `url` under `dest_dir` and return the written path.
    fn save(&self, url: &str, dest_dir: &Path) -> Result<PathBuf>;
}

/// Everything after the last `/` of `url`. Query strings are kept as-is,
/// matching the names VK's CDN URLs have always produced.
pub fn file_name_from_url(url: &str) -> &str {
    match url.rfind('/') {
        Some(idx) => &url[idx + 1..],
        None => url,
    }
}

/// Resolve `dest` to an absolute directory, creating it when missing.
pub fn prepare_destination(dest: &Path) -> Result<PathBuf> {
    let dest = std::path::absolute(dest).map_err(|e| Error::filesystem("resolving", dest, e))?;
    match fs::metadata(&dest) {
        Ok(meta) if meta.is_dir() => Ok(dest),
        Ok(_) => Err(Error::Config(format!(
            "destination '{}' should be a directory",
            dest.display()
        ))),
        Err(e) if e.kind() == ErrorKind::NotFound => {
            fs::create_dir_all(&dest).map_err(|e| Error::filesystem("creating", &dest, e))?;
            debug!(path = %dest.display(), "created destination directory");
            Ok(dest)
        }
        Err(e) => Err(Error::filesystem("inspecting", dest, e)),
    }
}

/// Streams assets over HTTP straight into the destination file.
///
/// Files are opened with truncation, so two photos whose URLs end in the
/// same segment collapse into one file holding the later download.
pub struct HttpSink {
    client: Client,
}

impl HttpSink {
    pub fn new(client: Client) -> Self {
        HttpSink { client }
    }
}

impl AssetSink for HttpSink {
    fn save(&self, url: &str, dest_dir: &Path) -> Result<PathBuf> {
        let name = file_name_from_url(url);
        let target = dest_dir.join(name);
        if name.is_empty() {
            return Err(Error::filesystem(
                "naming",
                target,
                std::io::Error::new(ErrorKind::InvalidInput, "URL has no final path segment"),
            ));
        }

        let mut res = self
            .client
            .get(url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(|e| Error::transport("download", e))?;

        let mut file = File::create(&target).map_err(|e| Error::filesystem("opening", &target, e))?;
        let written = copy_body(&mut res, &mut file, &target)?;
        debug!(path = %target.display(), bytes = written, "asset saved");
        Ok(target)
    }
}

/// Stream `body` into `file`, keeping read failures (network) apart from
/// write failures (local disk).
fn copy_body(body: &mut impl Read, file: &mut impl Write, target: &Path) -> Result<u64> {
    let mut buf = [0u8; 64 * 1024];
    let mut written = 0u64;
    loop {
        let n = match body.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(Error::transport_io("download", e)),
        };
        file.write_all(&buf[..n])
            .map_err(|e| Error::filesystem("writing", target, e))?;
        written += n as u64;
    }
    file.flush().map_err(|e| Error::filesystem("writing", target, e))?;
    Ok(written)
}
