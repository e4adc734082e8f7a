//! Filesystem-backed storage engine.
//!
//! [`Storage`] maps container and blob operations onto a directory tree
//! rooted at a single storage root (see [`Layout`]). It holds no in-memory
//! index: the filesystem is the only state, so several engines pointed at
//! the same root observe each other's writes.
//!
//! # Modes
//!
//! The engine is either *ready* or *degraded*, decided once at construction.
//! A degraded engine (root could not be created) answers every call with
//! [`StoreError::NotInitialized`] and never touches the filesystem.
//!
//! # Outcomes
//!
//! Expected conditions are not errors. A duplicate container or blob is an
//! `AlreadyExists` outcome, a blob without a sidecar is `Ok(None)` from
//! [`Storage::get_blob_metadata`], and a failed sidecar write after a
//! successful copy is [`UploadOutcome::UploadedWithoutMetadata`].

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::config::StorageConfig;
use crate::copy::{copy_staged, is_staging_file, Publish};
use crate::error::{StoreError, StoreResult};
use crate::layout::Layout;
use crate::metadata::{read_sidecar, write_sidecar, BlobMetadata};
use crate::names::{
    is_metadata_file, validate_blob_name, validate_container_name, validate_upload_name,
};
use crate::outcome::{ContainerStatus, UploadOutcome};

/// Storage engine over a local directory tree.
#[derive(Clone, Debug)]
pub struct Storage {
    /// `None` when the root could not be created (degraded mode).
    layout: Option<Layout>,
}

impl Storage {
    /// Open the engine described by `config`, creating the root if missing.
    ///
    /// Never fails: if the root cannot be created the engine starts degraded.
    pub fn open(config: &StorageConfig) -> Self {
        let root = &config.root;
        match fs::create_dir_all(root) {
            Ok(()) => {
                info!(root = %root.display(), "storage ready");
                Self {
                    layout: Some(Layout::new(root.clone())),
                }
            }
            Err(e) => {
                warn!(
                    root = %root.display(),
                    error = %e,
                    "cannot create or access storage root; storage is degraded"
                );
                Self { layout: None }
            }
        }
    }

    /// Open an engine rooted at `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self::open(&StorageConfig::with_root(root))
    }

    /// Open an engine rooted at the environment-selected default.
    pub fn from_env() -> Self {
        Self::open(&StorageConfig::from_env())
    }

    /// Returns `true` unless the engine is degraded.
    pub fn is_initialized(&self) -> bool {
        self.layout.is_some()
    }

    /// The storage root, or `None` when degraded.
    pub fn root(&self) -> Option<&Path> {
        self.layout.as_ref().map(Layout::root)
    }

    fn layout(&self, operation: &'static str) -> StoreResult<&Layout> {
        match &self.layout {
            Some(layout) => Ok(layout),
            None => {
                warn!(operation, "storage not initialized");
                Err(StoreError::NotInitialized { operation })
            }
        }
    }

    fn existing_container(&self, layout: &Layout, container: &str) -> StoreResult<PathBuf> {
        let path = layout.container_path(container);
        if path.is_dir() {
            Ok(path)
        } else {
            warn!(container, "container does not exist");
            Err(StoreError::ContainerNotFound(container.to_string()))
        }
    }

    // ---- Containers ----

    /// Create a container.
    ///
    /// An existing container is reported as [`ContainerStatus::AlreadyExists`],
    /// including when another process creates it between the check and the
    /// `mkdir`.
    pub fn create_container(&self, name: &str) -> StoreResult<ContainerStatus> {
        let layout = self.layout("create container")?;
        validate_container_name(name)?;

        let path = layout.container_path(name);
        if path.exists() {
            info!(container = name, "container already exists");
            return Ok(ContainerStatus::AlreadyExists(name.to_string()));
        }

        container_created(name, fs::create_dir(&path))
    }

    /// Returns `true` if `name` is an existing container.
    pub fn container_exists(&self, name: &str) -> StoreResult<bool> {
        let layout = self.layout("check container")?;
        validate_container_name(name)?;
        Ok(layout.container_path(name).is_dir())
    }

    /// Names of all containers, sorted ascending.
    ///
    /// An empty root yields `Ok(vec![])`; a root that cannot be read is an
    /// error, never an empty list.
    pub fn list_containers(&self) -> StoreResult<Vec<String>> {
        let layout = self.layout("list containers")?;
        let root = layout.root();

        let entries = read_dir_names(root, |path| path.is_dir()).map_err(|e| {
            warn!(root = %root.display(), error = %e, "cannot access containers");
            StoreError::io("list containers", e)
        })?;

        debug!(count = entries.len(), "listed containers");
        Ok(entries)
    }

    // ---- Blobs ----

    /// Upload a local file into `container` under its file name.
    ///
    /// Existing blobs are never overwritten. The copy is staged and published
    /// with a no-clobber rename, then the metadata sidecar is written.
    pub fn upload_blob(&self, container: &str, source: impl AsRef<Path>) -> StoreResult<UploadOutcome> {
        let source = source.as_ref();
        let layout = self.layout("upload")?;
        validate_container_name(container)?;
        self.existing_container(layout, container)?;

        if !source.is_file() {
            warn!(source = %source.display(), "source file not found");
            return Err(StoreError::SourceNotFound(source.to_path_buf()));
        }

        let blob = source
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| StoreError::InvalidName {
                name: source.display().to_string(),
                reason: "source file name is not valid UTF-8".into(),
            })?
            .to_string();
        validate_upload_name(&blob)?;

        let destination = layout.blob_path(container, &blob);
        if destination.exists() {
            info!(container, blob = %blob, "blob already exists; skipping upload");
            return Ok(UploadOutcome::AlreadyExists {
                container: container.to_string(),
                blob,
            });
        }

        let size = match copy_staged(source, &destination, Publish::NoClobber) {
            Ok(size) => size,
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                info!(container, blob = %blob, "blob appeared concurrently; skipping upload");
                return Ok(UploadOutcome::AlreadyExists {
                    container: container.to_string(),
                    blob,
                });
            }
            Err(e) => {
                warn!(container, blob = %blob, error = %e, "cannot copy blob");
                return Err(StoreError::io(
                    format!("copy '{}' to {}", source.display(), destination.display()),
                    e,
                ));
            }
        };

        let metadata = BlobMetadata::new(blob.clone(), size);
        let sidecar = layout.metadata_path(container, &blob);
        if let Ok(Some(previous)) = read_sidecar(&sidecar) {
            if previous.name != blob {
                warn!(
                    container,
                    blob = %blob,
                    previous = %previous.name,
                    "blobs share a stem; replacing sidecar"
                );
            }
        }

        match write_sidecar(&sidecar, &metadata) {
            Ok(()) => {
                info!(container, blob = %blob, size, "blob uploaded");
                Ok(UploadOutcome::Uploaded {
                    container: container.to_string(),
                    metadata,
                })
            }
            Err(e) => {
                warn!(container, blob = %blob, error = %e, "blob uploaded without metadata");
                Ok(UploadOutcome::UploadedWithoutMetadata {
                    container: container.to_string(),
                    blob,
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Names of the blobs in `container`, sorted ascending.
    ///
    /// Metadata sidecars, staging files and subdirectories are not blobs.
    /// With `verbose` the listing is also logged line by line; the returned
    /// names are the same either way.
    pub fn list_blobs(&self, container: &str, verbose: bool) -> StoreResult<Vec<String>> {
        let layout = self.layout("list blobs")?;
        validate_container_name(container)?;
        let dir = self.existing_container(layout, container)?;

        let mut blobs = read_dir_names(&dir, |path| path.is_file()).map_err(|e| {
            warn!(container, error = %e, "cannot access files in container");
            StoreError::io(format!("list blobs in '{container}'"), e)
        })?;
        blobs.retain(|name| !is_metadata_file(name) && !is_staging_file(name));

        if verbose {
            for line in summary_lines(&format!("container '{container}'"), "blob", &blobs) {
                info!("{line}");
            }
        } else {
            debug!(container, count = blobs.len(), "listed blobs");
        }
        Ok(blobs)
    }

    /// Copy a blob to `destination`.
    ///
    /// If `destination` is an existing directory the blob lands inside it
    /// under its own name; otherwise `destination` is the target file path
    /// and is replaced if present. Returns the path written.
    pub fn download_blob(
        &self,
        container: &str,
        blob: &str,
        destination: impl AsRef<Path>,
    ) -> StoreResult<PathBuf> {
        let destination = destination.as_ref();
        let layout = self.layout("download")?;
        validate_container_name(container)?;
        validate_blob_name(blob)?;

        let source = layout.blob_path(container, blob);
        if !source.is_file() || is_metadata_file(blob) || is_staging_file(blob) {
            warn!(container, blob, "blob not found");
            return Err(StoreError::BlobNotFound {
                container: container.to_string(),
                blob: blob.to_string(),
            });
        }

        let target = if destination.is_dir() {
            destination.join(blob)
        } else {
            destination.to_path_buf()
        };

        copy_staged(&source, &target, Publish::Overwrite).map_err(|e| {
            warn!(container, blob, target = %target.display(), error = %e, "cannot write blob");
            StoreError::io(format!("write blob to {}", target.display()), e)
        })?;

        info!(container, blob, target = %target.display(), "blob downloaded");
        Ok(target)
    }

    /// Metadata recorded when `blob` was uploaded.
    ///
    /// `Ok(None)` means there is no record: the blob was placed outside this
    /// engine, its sidecar write failed, or the sidecar under its stem
    /// belongs to another blob.
    pub fn get_blob_metadata(&self, container: &str, blob: &str) -> StoreResult<Option<BlobMetadata>> {
        let layout = self.layout("get metadata")?;
        validate_container_name(container)?;
        validate_blob_name(blob)?;

        let path = layout.metadata_path(container, blob);
        match read_sidecar(&path)? {
            Some(metadata) if metadata.name == blob => Ok(Some(metadata)),
            Some(other) => {
                debug!(container, blob, owner = %other.name, "sidecar belongs to another blob");
                Ok(None)
            }
            None => {
                debug!(container, blob, "no metadata");
                Ok(None)
            }
        }
    }
}

/// Sorted names of the entries in `dir` whose path satisfies `keep`.
///
/// `keep` follows symlinks, so a link to a directory counts as a directory.
fn read_dir_names(dir: &Path, keep: impl Fn(&Path) -> bool) -> io::Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if keep(&entry.path()) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}

/// Map the result of the container `mkdir` to a status.
///
/// `AlreadyExists` here means another process created the directory after
/// the existence check.
fn container_created(name: &str, result: io::Result<()>) -> StoreResult<ContainerStatus> {
    match result {
        Ok(()) => {
            info!(container = name, "container created");
            Ok(ContainerStatus::Created(name.to_string()))
        }
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            info!(container = name, "container already exists");
            Ok(ContainerStatus::AlreadyExists(name.to_string()))
        }
        Err(e) => {
            warn!(container = name, error = %e, "cannot create container");
            Err(StoreError::io(format!("create container '{name}'"), e))
        }
    }
}

/// Human-readable listing: a heading, numbered entries and a total.
///
/// ```
/// use bloblite_store::summary_lines;
///
/// let lines = summary_lines("container 'clients'", "blob", &["data.csv".to_string()]);
/// assert_eq!(lines[1], "  1. data.csv");
/// ```
pub fn summary_lines(scope: &str, noun: &str, items: &[String]) -> Vec<String> {
    if items.is_empty() {
        return vec![format!("{scope} has no {noun}s")];
    }
    let mut lines = Vec::with_capacity(items.len() + 2);
    lines.push(format!("{noun}s in {scope}:"));
    for (i, item) in items.iter().enumerate() {
        lines.push(format!("  {}. {item}", i + 1));
    }
    lines.push(format!("total: {} {noun}(s)", items.len()));
    lines
}
