use std::path::PathBuf;
use tokio::fs;

use crate::{
    api::error,
    clients::blob_store::{self, BlobStore},
};

/// Object store laid out on the local filesystem as `{root}/{bucket}/{key}`.
///
/// URLs are still minted against the configured region endpoint so records
/// stay portable to a hosted bucket.
#[derive(Clone)]
pub struct BlobStoreLocal {
    root: PathBuf,
    endpoint: String,
}

impl BlobStoreLocal {
    pub fn new(root: impl Into<PathBuf>, endpoint: impl Into<String>) -> Self {
        Self { root: root.into(), endpoint: endpoint.into() }
    }

    fn object_path(&self, bucket: &str, key: &str) -> Result<PathBuf, error::SystemError> {
        if !blob_store::is_valid_key(bucket) || !blob_store::is_valid_key(key) {
            return Err(error::SystemError::Dependency(error::DependencyError::BlobOpFailed(
                format!("invalid object location {}/{}", bucket, key),
            )));
        }
        Ok(self.root.join(bucket).join(key))
    }
}

#[async_trait::async_trait]
impl BlobStore for BlobStoreLocal {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, error::SystemError> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, &bytes).await?;

        log::debug!("Stored {} bytes ({}) at {:?}", bytes.len(), content_type, path);
        Ok(blob_store::object_url(bucket, &self.endpoint, key))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), error::SystemError> {
        let path = self.object_path(bucket, key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_root() -> PathBuf {
        std::env::temp_dir().join(format!("file-store-{}", uuid::Uuid::now_v7()))
    }

    #[actix_web::test]
    async fn test_put_then_delete_is_idempotent() {
        let root = scratch_root();
        let store = BlobStoreLocal::new(&root, "s3.us-west-1.amazonaws.com");

        let url = store.put("primary", "1-a.txt", b"hello".to_vec(), "text/plain").await.unwrap();
        assert_eq!(url, "https://primary.s3.us-west-1.amazonaws.com/1-a.txt");
        assert_eq!(std::fs::read(root.join("primary").join("1-a.txt")).unwrap(), b"hello");

        store.delete("primary", "1-a.txt").await.unwrap();
        assert!(!root.join("primary").join("1-a.txt").exists());
        store.delete("primary", "1-a.txt").await.unwrap();
        store.delete("never-created", "x").await.unwrap();

        let _ = std::fs::remove_dir_all(root);
    }

    #[actix_web::test]
    async fn test_rejects_traversal_keys() {
        let root = scratch_root();
        let store = BlobStoreLocal::new(&root, "example");

        let err = store.put("primary", "..", vec![], "text/plain").await.unwrap_err();
        assert!(matches!(
            err,
            error::SystemError::Dependency(error::DependencyError::BlobOpFailed(_))
        ));
        assert!(store.delete("primary", "../escape").await.is_err());
    }
}
