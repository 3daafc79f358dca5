//! Library error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while loading documents or configuration.
///
/// Decode failures of individual pages are not errors: the page ends up
/// [`Failed`](crate::doc::PageState::Failed) and still occupies layout space.
#[derive(Debug, Error)]
pub enum FolioError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("not a supported image format: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("no loadable images under {path}")]
    EmptyDocument { path: PathBuf },

    #[error("malformed config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
