use thiserror::Error;

/// Why the document collection could not be loaded.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to fetch search data: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("search data request returned HTTP {0}")]
    Status(u16),

    #[error("failed to read search data: {0}")]
    Io(#[from] std::io::Error),

    #[error("search data is not a valid document list: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid search data location: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("result_limit must be between 1 and 100, got {0}")]
    ResultLimit(usize),

    #[error("index_path must be an absolute path, got {0:?}")]
    IndexPath(String),
}
