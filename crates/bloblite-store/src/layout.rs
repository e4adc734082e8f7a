use std::path::{Path, PathBuf};

use crate::metadata::sidecar_file_name;

/// Deterministic mapping from container and blob names to paths under the
/// storage root.
///
/// ```text
/// <root>/
///   <container>/
///     <blob>
///     <blob-stem>.metadata.json
/// ```
///
/// Names are joined as-is; callers validate them first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn container_path(&self, container: &str) -> PathBuf {
        self.root.join(container)
    }

    pub fn blob_path(&self, container: &str, blob: &str) -> PathBuf {
        self.container_path(container).join(blob)
    }

    pub fn metadata_path(&self, container: &str, blob: &str) -> PathBuf {
        self.container_path(container).join(sidecar_file_name(blob))
    }
}
