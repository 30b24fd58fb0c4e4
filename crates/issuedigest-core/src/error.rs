use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportLoadError {
    #[error("{source}: '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{0}")]
    Parse(#[from] serde_json::Error),
    #[error("expected a top-level JSON array, found {found}")]
    NotAnArray { found: &'static str },
    #[error("issue at index {index} is not a JSON object")]
    NotAnObject { index: usize },
}

#[derive(Debug, Error)]
pub enum PatchError {
    #[error("{source}: '{}'", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("anchor text must not be empty")]
    EmptyAnchor,
    #[error("anchor text not found in {}", .path.display())]
    AnchorNotFound { path: PathBuf },
}
