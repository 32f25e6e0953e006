// Error type shared by every stage of a run. All variants are fatal for the
// run except where the deletion driver absorbs them into its retry budget.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Network-level failure, a non-success HTTP status, or a broken body
    /// stream. reqwest errors are stored without their URL so the access
    /// token never ends up in a diagnostic.
    #[error("{operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Body was not JSON or did not match the expected schema.
    #[error("could not decode {operation} response: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Well-formed response that is not the success sentinel.
    #[error("{operation} returned {response} instead of the success value{}", .detail.as_ref().map(|d| format!(" ({d})")).unwrap_or_default())]
    Api {
        operation: &'static str,
        response: i64,
        detail: Option<String>,
    },

    #[error("{action} '{}' failed: {source}", .path.display())]
    Filesystem {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("photo {item_id} has no size variants to download")]
    NoVariants { item_id: i64 },
}

impl Error {
    pub(crate) fn transport(operation: &'static str, source: reqwest::Error) -> Self {
        Error::Transport {
            operation,
            source: Box::new(source.without_url()),
        }
    }

    /// Failure while reading a response body through `std::io::Read`.
    pub(crate) fn transport_io(operation: &'static str, source: std::io::Error) -> Self {
        Error::Transport {
            operation,
            source: Box::new(source),
        }
    }

    pub(crate) fn filesystem(
        action: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Error::Filesystem {
            action,
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_mentions_remote_detail() {
        let err = Error::Api {
            operation: "photos.delete",
            response: 0,
            detail: Some("15: Access denied".into()),
        };
        assert_eq!(
            err.to_string(),
            "photos.delete returned 0 instead of the success value (15: Access denied)"
        );
    }

    #[test]
    fn api_error_without_detail() {
        let err = Error::Api {
            operation: "photos.delete",
            response: 2,
            detail: None,
        };
        assert_eq!(
            err.to_string(),
            "photos.delete returned 2 instead of the success value"
        );
    }
}
