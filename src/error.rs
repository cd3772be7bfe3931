//! Fatal faults. Any of these ends the run: the generator cannot trust
//! its own output once the environment misbehaves.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum GenError {
    #[error("IO: {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Parse: {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("Render: {0}")]
    Render(#[from] std::fmt::Error),
}

impl GenError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        GenError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn parse(path: impl Into<PathBuf>, message: String) -> Self {
        GenError::Parse {
            path: path.into(),
            message,
        }
    }
}
