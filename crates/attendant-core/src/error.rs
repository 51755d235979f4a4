use thiserror::Error;

#[derive(Debug, Error)]
pub enum AttendantError {
    #[error("not initialized: run 'attendant init'")]
    NotInitialized,

    #[error("invalid event id '{0}': must be alphanumeric with '-' or '_'")]
    InvalidEventId(String),

    #[error("position not found: {0}")]
    PositionNotFound(String),

    #[error("position {0} already exists")]
    PositionNumberTaken(u32),

    #[error("invalid position number {0}: must be between 1 and 1000")]
    InvalidPositionNumber(u32),

    #[error("position name is required")]
    EmptyPositionName,

    #[error("no position names supplied")]
    NoPositionNames,

    #[error("invalid range: {0}")]
    InvalidRange(String),

    #[error("positions already exist: {}", join_numbers(.0))]
    RangeConflict(Vec<u32>),

    #[error("store rejected request: {0}")]
    Store(String),

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn join_numbers(numbers: &[u32]) -> String {
    numbers
        .iter()
        .map(|n| n.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

pub type Result<T> = std::result::Result<T, AttendantError>;
