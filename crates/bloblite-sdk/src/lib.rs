//! Client-style API for BlobLite.
//!
//! Mirrors the shape of a cloud blob SDK: a [`BlobServiceClient`] bound to a
//! storage root hands out [`ContainerClient`]s scoped to one container. Both
//! delegate to a shared [`bloblite_store::Storage`] engine and add no storage
//! behavior of their own.

pub mod container;
pub mod error;
pub mod service;

pub use container::ContainerClient;
pub use error::{SdkError, SdkResult};
pub use service::BlobServiceClient;

// Re-export key types
pub use bloblite_store::{
    BlobMetadata, ContainerStatus, ErrorKind, Severity, Storage, StorageConfig, StoreError,
    UploadOutcome,
};
