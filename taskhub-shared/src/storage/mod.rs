/// Object storage adapter
///
/// Wraps the S3 client for the two operations the API needs: uploading a
/// task attachment as a private object and minting a time-limited presigned
/// download URL for it. File bytes are never proxied back through the API;
/// retrieval always goes through a presigned URL.
///
/// # Example
///
/// ```no_run
/// use taskhub_shared::storage::{attachment_key, ObjectStore};
/// use std::time::Duration;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = ObjectStore::from_env("taskhub-files".to_string()).await;
///
/// let key = attachment_key(Uuid::new_v4(), "report.pdf");
/// store.upload(&key, b"...".to_vec().into(), "application/pdf").await?;
///
/// let url = store.presigned_download_url(&key, Duration::from_secs(900)).await?;
/// # Ok(())
/// # }
/// ```

use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use bytes::Bytes;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

/// How long presigned download URLs stay valid: 15 minutes
pub const DOWNLOAD_URL_TTL: Duration = Duration::from_secs(900);

/// Error type for object storage operations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Upload to object storage failed
    #[error("Upload failed: {0}")]
    Upload(String),

    /// Presigned URL generation failed
    #[error("Presigning failed: {0}")]
    Presign(String),
}

/// S3-backed object store scoped to a single bucket
#[derive(Debug, Clone)]
pub struct ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl ObjectStore {
    /// Creates an object store from an existing client
    pub fn new(client: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    /// Creates an object store using the ambient AWS configuration
    /// (environment credentials, region, etc.)
    pub async fn from_env(bucket: String) -> Self {
        let config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
        Self::new(aws_sdk_s3::Client::new(&config), bucket)
    }

    /// Uploads an object with private access
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Upload` if the put fails
    pub async fn upload(
        &self,
        key: &str,
        body: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        debug!(key, bucket = %self.bucket, "Uploading object");

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .acl(ObjectCannedAcl::Private)
            .send()
            .await
            .map_err(|e| StorageError::Upload(e.to_string()))?;

        Ok(())
    }

    /// Mints a time-limited presigned GET URL for an object
    ///
    /// The URL embeds temporary credentials, so the bucket stays private
    /// and the service's long-lived credentials are never exposed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Presign` if URL generation fails
    pub async fn presigned_download_url(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> Result<String, StorageError> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        let request = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| StorageError::Presign(e.to_string()))?;

        Ok(request.uri().to_string())
    }
}

/// Generates a globally unique storage key for a task attachment
///
/// Keys are scoped by task id so objects group naturally in the bucket:
/// `tasks/{task_id}/{uuid}-{filename}`.
pub fn attachment_key(task_id: Uuid, filename: &str) -> String {
    format!("tasks/{}/{}-{}", task_id, Uuid::new_v4(), filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};

    fn test_store() -> ObjectStore {
        let credentials = Credentials::new("test-access-key", "test-secret-key", None, None, "test");
        let config = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(credentials)
            .build();

        ObjectStore::new(aws_sdk_s3::Client::from_conf(config), "test-bucket".to_string())
    }

    #[test]
    fn test_attachment_key_is_task_scoped() {
        let task_id = Uuid::new_v4();
        let key = attachment_key(task_id, "report.pdf");

        assert!(key.starts_with(&format!("tasks/{}/", task_id)));
        assert!(key.ends_with("-report.pdf"));
    }

    #[test]
    fn test_attachment_keys_are_unique() {
        let task_id = Uuid::new_v4();
        let a = attachment_key(task_id, "same.txt");
        let b = attachment_key(task_id, "same.txt");
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_presigned_url_embeds_key_and_expiry() {
        let store = test_store();

        let url = store
            .presigned_download_url("tasks/abc/file.txt", Duration::from_secs(900))
            .await
            .unwrap();

        assert!(url.contains("test-bucket"));
        assert!(url.contains("tasks/abc/file.txt"));
        assert!(url.contains("X-Amz-Expires=900"));
    }
}
