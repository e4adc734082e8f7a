use std::path::Path;
use std::sync::Arc;

use bloblite_store::{ContainerStatus, Storage, StorageConfig};

use crate::container::ContainerClient;
use crate::error::SdkResult;

/// Entry point bound to one storage root.
#[derive(Clone, Debug)]
pub struct BlobServiceClient {
    storage: Arc<Storage>,
}

impl BlobServiceClient {
    /// Open a client over the engine described by `config`.
    pub fn new(config: &StorageConfig) -> Self {
        Self::from_storage(Arc::new(Storage::open(config)))
    }

    /// Open a client rooted at `root`.
    pub fn with_root(root: impl AsRef<Path>) -> Self {
        Self::new(&StorageConfig::with_root(root))
    }

    /// Open a client rooted at the environment-selected default.
    pub fn from_env() -> Self {
        Self::new(&StorageConfig::from_env())
    }

    /// Wrap an engine that is already open.
    pub fn from_storage(storage: Arc<Storage>) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    pub fn is_initialized(&self) -> bool {
        self.storage.is_initialized()
    }

    pub fn root(&self) -> Option<&Path> {
        self.storage.root()
    }

    /// Names of all containers, sorted ascending.
    pub fn list_containers(&self) -> SdkResult<Vec<String>> {
        Ok(self.storage.list_containers()?)
    }

    /// Create a container and return a client for it.
    pub fn create_container(&self, name: &str) -> SdkResult<(ContainerClient, ContainerStatus)> {
        let status = self.storage.create_container(name)?;
        Ok((self.get_container_client(name), status))
    }

    /// Client for `name`. The container does not have to exist yet.
    pub fn get_container_client(&self, name: impl Into<String>) -> ContainerClient {
        ContainerClient::new(name, Arc::clone(&self.storage))
    }
}
