use std::path::PathBuf;
use thiserror::Error;
#[derive(Debug, Error)]
pub enum GlobcatError {
    #[error("{path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("{path}: {message}")]
    Walk { path: PathBuf, message: String },
    #[error("no match for {0}")]
    NoMatch(String),
    #[error("match glob {pattern}: {message}")]
    InvalidGlob { pattern: String, message: String },
    #[error("failed to build worker pool: {0}")]
    ThreadPool(String),
}
impl GlobcatError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GlobcatError::Io {
            path: path.into(),
            source,
        }
    }
    /// The filesystem path or argument this error is attributed to.
    pub fn path(&self) -> Option<PathBuf> {
        match self {
            GlobcatError::Io { path, .. } | GlobcatError::Walk { path, .. } => Some(path.clone()),
            GlobcatError::NoMatch(arg) => Some(PathBuf::from(arg)),
            GlobcatError::InvalidGlob { pattern, .. } => Some(PathBuf::from(pattern)),
            GlobcatError::ThreadPool(_) => None,
        }
    }
}
