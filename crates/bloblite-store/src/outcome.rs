use std::fmt;

use crate::metadata::BlobMetadata;

/// How a successful outcome should be presented.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// The operation did what was asked.
    Ok,
    /// Nothing changed, by policy (e.g. a duplicate).
    Info,
    /// The operation completed only partially.
    Warning,
}

/// Result of `create_container`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerStatus {
    Created(String),
    AlreadyExists(String),
}

impl ContainerStatus {
    pub fn name(&self) -> &str {
        match self {
            Self::Created(name) | Self::AlreadyExists(name) => name,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Created(_) => Severity::Ok,
            Self::AlreadyExists(_) => Severity::Info,
        }
    }
}

impl fmt::Display for ContainerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created(name) => write!(f, "container '{name}' created"),
            Self::AlreadyExists(name) => write!(f, "container '{name}' already exists"),
        }
    }
}

/// Result of `upload_blob`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Blob copied and its metadata sidecar written.
    Uploaded {
        container: String,
        metadata: BlobMetadata,
    },
    /// A blob with this name is already in the container; nothing was written.
    AlreadyExists { container: String, blob: String },
    /// Blob copied, but the sidecar could not be written. The blob is kept.
    UploadedWithoutMetadata {
        container: String,
        blob: String,
        reason: String,
    },
}

impl UploadOutcome {
    pub fn blob_name(&self) -> &str {
        match self {
            Self::Uploaded { metadata, .. } => &metadata.name,
            Self::AlreadyExists { blob, .. } | Self::UploadedWithoutMetadata { blob, .. } => blob,
        }
    }

    pub fn container(&self) -> &str {
        match self {
            Self::Uploaded { container, .. }
            | Self::AlreadyExists { container, .. }
            | Self::UploadedWithoutMetadata { container, .. } => container,
        }
    }

    /// Metadata written by this upload, if any.
    pub fn metadata(&self) -> Option<&BlobMetadata> {
        match self {
            Self::Uploaded { metadata, .. } => Some(metadata),
            _ => None,
        }
    }

    /// Returns `true` if the blob bytes were written by this call.
    pub fn is_stored(&self) -> bool {
        !matches!(self, Self::AlreadyExists { .. })
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::Uploaded { .. } => Severity::Ok,
            Self::AlreadyExists { .. } => Severity::Info,
            Self::UploadedWithoutMetadata { .. } => Severity::Warning,
        }
    }
}

impl fmt::Display for UploadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uploaded { container, metadata } => write!(
                f,
                "uploaded '{}' to container '{container}'",
                metadata.name
            ),
            Self::AlreadyExists { container, blob } => write!(
                f,
                "blob '{blob}' already exists in container '{container}'; skipping upload"
            ),
            Self::UploadedWithoutMetadata {
                container,
                blob,
                reason,
            } => write!(
                f,
                "uploaded '{blob}' to container '{container}' but failed to write metadata: {reason}"
            ),
        }
    }
}
