use std::fmt;
use std::io;
use std::path::PathBuf;

/// Coarse classification of a failed storage operation.
///
/// Callers that only care about "what went wrong" (not the exact path or
/// container involved) can branch on this instead of matching every
/// [`StoreError`] variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The storage root could not be created; the engine is degraded.
    NotInitialized,
    /// A referenced container, blob, or source file does not exist.
    NotFound,
    /// The operating system refused access.
    PermissionDenied,
    /// Any other filesystem failure.
    IoFailure,
    /// A metadata sidecar exists but cannot be parsed.
    CorruptMetadata,
    /// A container or blob name is not a single safe path component.
    InvalidName,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotInitialized => "not initialized",
            Self::NotFound => "not found",
            Self::PermissionDenied => "permission denied",
            Self::IoFailure => "I/O failure",
            Self::CorruptMetadata => "corrupt metadata",
            Self::InvalidName => "invalid name",
        };
        f.write_str(s)
    }
}

/// Errors from storage engine operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage root is unavailable; every call on this engine fails.
    #[error("storage not initialized: cannot {operation}")]
    NotInitialized { operation: &'static str },

    /// The named container does not exist under the storage root.
    #[error("container '{0}' does not exist")]
    ContainerNotFound(String),

    /// The local file given for upload does not exist.
    #[error("source file '{}' not found", .0.display())]
    SourceNotFound(PathBuf),

    /// The named blob does not exist in the container.
    #[error("blob '{blob}' not found in container '{container}'")]
    BlobNotFound { container: String, blob: String },

    /// A container or blob name failed validation.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A metadata sidecar exists but does not hold a valid record.
    #[error("corrupt metadata at {}: {reason}", .path.display())]
    CorruptMetadata { path: PathBuf, reason: String },

    /// A filesystem call failed mid-operation.
    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },
}

impl StoreError {
    /// Build an [`StoreError::Io`] with a short description of what was attempted.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotInitialized { .. } => ErrorKind::NotInitialized,
            Self::ContainerNotFound(_) | Self::SourceNotFound(_) | Self::BlobNotFound { .. } => {
                ErrorKind::NotFound
            }
            Self::InvalidName { .. } => ErrorKind::InvalidName,
            Self::CorruptMetadata { .. } => ErrorKind::CorruptMetadata,
            Self::Io { source, .. } => match source.kind() {
                io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
                io::ErrorKind::NotFound => ErrorKind::NotFound,
                _ => ErrorKind::IoFailure,
            },
        }
    }

    /// Returns `true` for errors caused by a missing container, blob, or source.
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }
}

/// Result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;
