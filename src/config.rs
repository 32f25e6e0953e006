// Immutable run configuration, built once from the command line and passed
// by reference to every stage.

use crate::api::{DEFAULT_API_URL, DEFAULT_API_VERSION};
use crate::cli::Args;
use crate::deletion::DeletionPolicy;
use crate::error::{Error, Result};
use std::path::PathBuf;

/// Owner whose albums are read when `--owner` is not given.
pub const DEFAULT_OWNER_ID: i64 = 59233038;
pub const DEFAULT_WINDOW_SIZE: u32 = 10;
/// Largest `count` accepted by `photos.get`.
pub const MAX_WINDOW_SIZE: u32 = 1000;

#[derive(Clone)]
pub struct Config {
    pub access_token: String,
    pub api_url: String,
    pub api_version: String,
    pub album: String,
    pub owner_id: i64,
    pub dest: PathBuf,
    /// When set, photos are only saved and the deletion driver never runs.
    pub dry_run: bool,
    /// Photos requested per `photos.get` call.
    pub window_size: u32,
    pub deletion: DeletionPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            access_token: String::new(),
            api_url: DEFAULT_API_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            album: "saved".to_string(),
            owner_id: DEFAULT_OWNER_ID,
            dest: PathBuf::from("."),
            dry_run: true,
            window_size: DEFAULT_WINDOW_SIZE,
            deletion: DeletionPolicy::default(),
        }
    }
}

// The token stays out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_token", &"<redacted>")
            .field("api_url", &self.api_url)
            .field("api_version", &self.api_version)
            .field("album", &self.album)
            .field("owner_id", &self.owner_id)
            .field("dest", &self.dest)
            .field("dry_run", &self.dry_run)
            .field("window_size", &self.window_size)
            .field("deletion", &self.deletion)
            .finish()
    }
}

impl Config {
    pub fn from_args(args: &Args) -> Result<Self> {
        let access_token = args
            .access_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                Error::Config(
                    "please set vk.com access token in ACCESS_TOKEN environment variable".into(),
                )
            })?;

        if args.count == 0 || args.count > MAX_WINDOW_SIZE {
            return Err(Error::Config(format!(
                "count must be between 1 and {MAX_WINDOW_SIZE}, got {}",
                args.count
            )));
        }
        if args.album.trim().is_empty() {
            return Err(Error::Config("album must not be empty".into()));
        }
        if args.dest.as_os_str().is_empty() {
            return Err(Error::Config("destination must not be empty".into()));
        }

        Ok(Config {
            access_token: access_token.to_string(),
            api_url: args.api_url.clone(),
            api_version: args.api_version.clone(),
            album: args.album.clone(),
            owner_id: args.owner,
            dest: args.dest.clone(),
            dry_run: args.dry_run,
            window_size: args.count,
            deletion: DeletionPolicy::default(),
        })
    }
}
