use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ManeLocaError>;

#[derive(Debug, Error)]
pub enum ManeLocaError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Could not fetch '{url}': {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("TSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Could not read config '{path}': {message}")]
    Config { path: String, message: String },

    #[error("Could not load {resource}: {message}")]
    Load { resource: String, message: String },

    #[error("No data to export!")]
    EmptyExport,

    #[error("Could not write '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Invalid(String),
}
