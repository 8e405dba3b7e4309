use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between building a request URL and
/// writing the cleaned file.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, connect, TLS, body read).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with something other than 200. Nothing is
    /// written to disk in this case.
    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// The body (or a stored file) is not valid JSON. `origin` is the URL
    /// or file path it came from.
    #[error("{origin} is not valid JSON: {source}")]
    Parse {
        origin: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to serialize JSON for {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl FetchError {
    /// HTTP status code for `Status` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> FetchError {
        let path = path.into();
        move |source| FetchError::Io { path, source }
    }
}
