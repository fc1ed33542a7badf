//! Error types for champion sources and the import run.
use std::path::PathBuf;

use thiserror::Error;

use runtime::RepositoryError;

/// Failure to fetch or decode one upstream document.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("request to {url} failed")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned {status}")]
    Status { url: String, status: u16 },

    #[error("could not decode {url}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed champion data: {0}")]
    Malformed(String),
}

/// Failure while importing.
///
/// [`ImportError::ChampionList`] aborts the run; everything else is recorded
/// against the champion being processed.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not fetch the champion list")]
    ChampionList(#[source] SourceError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("could not write asset {path}")]
    Asset {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ImportError>;
