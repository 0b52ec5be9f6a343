use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No bundled binary exists for the running platform. Carries the lookup
    /// key that was searched so callers can report what was expected.
    #[error("library not supported on this platform: '{path}' not found")]
    NotSupported { path: String },

    /// The resource exists but copying it out to a loadable file failed.
    #[error("failed to extract library resource: {source}")]
    Extraction { source: io::Error },

    /// The resolved file could not be linked into the process.
    #[error("failed to link native library '{}': {source}", path.display())]
    Link {
        path: PathBuf,
        source: libloading::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
