use std::path::PathBuf;
use crate::series::SeriesKind;

#[derive(Debug, thiserror::Error)]
pub enum ForecastError {
    #[error("checkpoint not found: {}", .0.display())]
    CheckpointMissing(PathBuf),
    #[error("checkpoint error: {0}")]
    Checkpoint(String),
    #[error("{0} series has no rows")]
    EmptySeries(SeriesKind),
    #[error("unknown series selector: {0:?}")]
    UnknownSeries(String),
    #[error("{}:{line}: {msg}", .path.display())]
    Parse {
        path: PathBuf,
        line: u64,
        msg: String,
    },
    #[error("tensor error: {0}")]
    Tensor(String),
    #[error("render error: {0}")]
    Render(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type ForecastResult<T> = Result<T, ForecastError>;
