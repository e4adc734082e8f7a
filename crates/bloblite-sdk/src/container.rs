use std::path::{Path, PathBuf};
use std::sync::Arc;

use bloblite_store::{BlobMetadata, ContainerStatus, Storage, UploadOutcome};

use crate::error::SdkResult;

/// Client scoped to a single container.
#[derive(Clone, Debug)]
pub struct ContainerClient {
    name: String,
    storage: Arc<Storage>,
}

impl ContainerClient {
    pub fn new(name: impl Into<String>, storage: Arc<Storage>) -> Self {
        Self {
            name: name.into(),
            storage,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    pub fn exists(&self) -> SdkResult<bool> {
        Ok(self.storage.container_exists(&self.name)?)
    }

    /// Create this container if it does not exist.
    pub fn create_container(&self) -> SdkResult<ContainerStatus> {
        Ok(self.storage.create_container(&self.name)?)
    }

    /// Blob names in this container, sorted ascending.
    pub fn list_blobs(&self) -> SdkResult<Vec<String>> {
        Ok(self.storage.list_blobs(&self.name, true)?)
    }

    pub fn upload_blob(&self, file_path: impl AsRef<Path>) -> SdkResult<UploadOutcome> {
        Ok(self.storage.upload_blob(&self.name, file_path)?)
    }

    /// Copy `blob_name` to `dest_path`, returning the file written.
    pub fn download_blob(&self, blob_name: &str, dest_path: impl AsRef<Path>) -> SdkResult<PathBuf> {
        Ok(self.storage.download_blob(&self.name, blob_name, dest_path)?)
    }

    pub fn get_blob_metadata(&self, blob_name: &str) -> SdkResult<Option<BlobMetadata>> {
        Ok(self.storage.get_blob_metadata(&self.name, blob_name)?)
    }
}

#[cfg(test)]
mod tests {
    use crate::{BlobServiceClient, ErrorKind, SdkError, StoreError, UploadOutcome};
    use std::fs;

    #[test]
    fn upload_list_download_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let service = BlobServiceClient::with_root(dir.path().join("root"));
        let client = service.get_container_client("docs");
        assert!(!client.exists().unwrap());
        assert!(client.create_container().unwrap().is_created());
        assert!(client.exists().unwrap());

        let source = dir.path().join("sample.txt");
        fs::write(&source, b"Contenido de texto de prueba").unwrap();
        let outcome = client.upload_blob(&source).unwrap();
        assert!(matches!(outcome, UploadOutcome::Uploaded { .. }));

        assert_eq!(client.list_blobs().unwrap(), vec!["sample.txt"]);

        let target = dir.path().join("copy.txt");
        let written = client.download_blob("sample.txt", &target).unwrap();
        assert_eq!(written, target);
        assert_eq!(fs::read(&target).unwrap(), fs::read(&source).unwrap());

        let meta = client.get_blob_metadata("sample.txt").unwrap().unwrap();
        assert_eq!(meta.size, 28);
    }

    #[test]
    fn missing_container_surfaces_store_error() {
        let dir = tempfile::tempdir().unwrap();
        let service = BlobServiceClient::with_root(dir.path().join("root"));
        let client = service.get_container_client("ghost");

        let source = dir.path().join("a.bin");
        fs::write(&source, [0u8, 1, 2, 3]).unwrap();

        let err = client.upload_blob(&source).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(matches!(
            err,
            SdkError::Store(StoreError::ContainerNotFound(ref name)) if name == "ghost"
        ));
    }

    #[test]
    fn metadata_absent_for_unknown_blob() {
        let dir = tempfile::tempdir().unwrap();
        let service = BlobServiceClient::with_root(dir.path());
        let (client, _) = service.create_container("c").unwrap();

        assert!(client.get_blob_metadata("never_uploaded.txt").unwrap().is_none());
    }
}
