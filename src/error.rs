use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Reasons a launch request can be rejected.
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("no application selected")]
    EmptyPath,

    #[error("application does not exist: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("failed to run '{program}': {source}")]
    SpawnFailure {
        program: String,
        #[source]
        source: io::Error,
    },
}
