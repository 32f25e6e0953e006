// Library root
// -----------
// Saves the photos of a VK album to disk, window by window, and optionally
// deletes them from VK once saved. The binary (`main.rs`) only parses flags
// and sets up logging.
//
// Module responsibilities:
// - `api`: blocking client for `photos.get` / `photos.delete`, behind the
//   `PhotoApi` trait.
// - `model`: JSON schema of those two methods.
// - `select`: picks the highest resolution rendition of a photo.
// - `sink`: destination directory handling and streaming downloads.
// - `pipeline`: the pagination loop tying listing, saving and deleting.
// - `deletion`: rate limited deletion with a bounded backoff budget.
// - `config` / `cli`: flags, environment and the immutable run settings.
// - `ui`: progress bar and the deletion confirmation prompt.
pub mod api;
pub mod cli;
pub mod config;
pub mod deletion;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod select;
pub mod sink;
pub mod ui;

pub use error::{Error, Result};
