use thiserror::Error;

#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Dataset error: {0}")]
    Dataset(String),

    #[error("Unknown filter: {0}")]
    UnknownFilter(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
