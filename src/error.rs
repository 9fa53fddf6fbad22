use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::relocation::ArtifactKind;

pub type RelocateResult<T> = Result<T, RelocateError>;

#[derive(Error, Debug)]
pub enum RelocateError {
    #[error("{kind} not found at {path} (did the build step run?)")]
    MissingSource { kind: ArtifactKind, path: PathBuf },

    #[error("{kind} destination {path} already exists; refusing to overwrite")]
    DestinationConflict { kind: ArtifactKind, path: PathBuf },

    #[error("cross-volume move of {from} to {to} failed")]
    CrossVolume {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("backend path {path} has no file name")]
    InvalidBackendPath { path: PathBuf },

    #[error("{op} failed for {path}")]
    Io {
        op: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl RelocateError {
    pub(crate) fn io(op: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| RelocateError::Io { op, path, source }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_missing_source_display() {
        let err = RelocateError::MissingSource {
            kind: ArtifactKind::FrontendBundle,
            path: PathBuf::from("web/build"),
        };
        assert_eq!(
            err.to_string(),
            "frontend bundle not found at web/build (did the build step run?)"
        );
    }

    #[test]
    fn test_destination_conflict_display() {
        let err = RelocateError::DestinationConflict {
            kind: ArtifactKind::BackendExecutable,
            path: PathBuf::from("deploy/lwoss"),
        };
        assert_eq!(
            err.to_string(),
            "backend executable destination deploy/lwoss already exists; refusing to overwrite"
        );
    }

    #[test]
    fn test_io_keeps_underlying_error_as_source() {
        let err = RelocateError::io("rename", "web/build")(io::Error::new(
            io::ErrorKind::PermissionDenied,
            "denied",
        ));
        assert_eq!(err.to_string(), "rename failed for web/build");
        assert_eq!(err.source().unwrap().to_string(), "denied");
    }
}
