use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    #[error("could not locate home directory")]
    NoHome,

    #[error("no group at index {0}")]
    GroupNotFound(usize),

    #[error("group {title:?} has no item at index {index}")]
    ItemNotFound { title: String, index: usize },

    #[error("a group titled {0:?} already exists")]
    DuplicateTitle(String),

    #[error("group titles cannot be empty")]
    EmptyTitle,
}

pub type Result<T> = std::result::Result<T, ConfigError>;
