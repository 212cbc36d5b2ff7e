use crate::api::error;

/// Client for the external blob store.
#[async_trait::async_trait]
pub trait BlobStore: Send + Sync {
    /// Stores `bytes` under `bucket/key` and returns the object's fully-qualified URL.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, error::SystemError>;

    /// Removing an object that does not exist succeeds.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), error::SystemError>;
}

/// `https://{bucket}.{endpoint}/{key}`
pub fn object_url(bucket: &str, endpoint: &str, key: &str) -> String {
    format!("https://{}.{}/{}", bucket, endpoint, key)
}

/// Object key of a stored URL: its final `/`-delimited segment.
pub fn object_key(url: &str) -> &str {
    url.rsplit('/').next().unwrap_or(url)
}

/// Keys must be a single path segment.
pub fn is_valid_key(key: &str) -> bool {
    !key.is_empty() && !key.starts_with('.') && !key.contains(['/', '\\'])
}
