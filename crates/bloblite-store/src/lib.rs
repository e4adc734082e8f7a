//! Filesystem-backed blob storage engine for BlobLite.
//!
//! This crate emulates a cloud object store locally: containers are
//! directories under a storage root, blobs are files inside them, and each
//! uploaded blob gets a JSON metadata sidecar.
//!
//! ```text
//! <root>/
//!   <container>/
//!     <blob>
//!     <blob-stem>.metadata.json
//! ```
//!
//! # Operations
//!
//! All operations live on [`Storage`]:
//!
//! - [`Storage::create_container`] / [`Storage::list_containers`]
//! - [`Storage::upload_blob`] / [`Storage::list_blobs`]
//! - [`Storage::download_blob`] / [`Storage::get_blob_metadata`]
//!
//! # Design Rules
//!
//! 1. The filesystem is the only state; there is no in-memory index.
//! 2. Blobs are never overwritten, mutated, or deleted.
//! 3. Expected conditions (duplicates, missing metadata) are `Ok` outcomes.
//! 4. Failures are returned as [`StoreError`]; nothing panics.
//! 5. A root that cannot be created degrades the engine instead of failing.

pub mod config;
pub mod copy;
pub mod error;
pub mod layout;
pub mod metadata;
pub mod names;
pub mod outcome;
pub mod storage;

// Re-export primary types at crate root for ergonomic imports.
pub use config::{default_root, StorageConfig, DEFAULT_ROOT_DIR_NAME, ROOT_ENV_VAR};
pub use error::{ErrorKind, StoreError, StoreResult};
pub use layout::Layout;
pub use metadata::{sidecar_file_name, BlobMetadata, DEFAULT_CONTENT_TYPE, METADATA_SUFFIX};
pub use outcome::{ContainerStatus, Severity, UploadOutcome};
pub use storage::{summary_lines, Storage};
