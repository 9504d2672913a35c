use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Must specify raw geojson file as first argument")]
    Usage,

    #[error("Input file not found: {}", path.display())]
    InputNotFound { path: PathBuf },

    #[error("Bad JSON in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Top-level JSON must be an object")]
    NotAnObject,

    #[error("Document has no `features` key")]
    MissingFeatures,

    #[error("`features` must be an array, found {found}")]
    FeaturesNotArray { found: &'static str },

    // Never overwrite a previous run's output
    #[error("Output file already exists: {}", path.display())]
    OutputExists { path: PathBuf },

    #[error("Cannot write {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl SampleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SampleError::Io { path: path.into(), source }
    }
}

pub type Result<T> = std::result::Result<T, SampleError>;
