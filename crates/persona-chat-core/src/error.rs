use std::io;
use std::path::PathBuf;

use reqwest::StatusCode;
use thiserror::Error;

/// Anything that keeps a chat request from producing a reply.
///
/// The session treats every variant the same way; the distinction only
/// exists for the log.
#[derive(Debug, Error)]
pub enum SendFailure {
    #[error("chat request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("chat endpoint returned status {0}")]
    Status(StatusCode),

    #[error("chat endpoint returned an unexpected body: {0}")]
    MalformedResponse(String),

    #[error("chat request was interrupted: {0}")]
    Interrupted(String),
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("unknown personality `{0}`")]
    UnknownPersonality(String),

    #[error("could not determine config directory")]
    NoConfigDir,

    #[error("failed to read config at {path:?}: {source}")]
    ReadConfig {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config at {path:?}: {source}")]
    ParseConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
