use log::{info, warn};
use std::sync::Arc;
use uuid::Uuid;

use crate::api::error;
use crate::clients::{blob_store, BlobStore, Notifier, ReplicationMessage};
use crate::configs::StorageConfig;
use crate::modules::file::{
    model::{decode_file_data, DeleteFileModel, UpdateFileModel, UploadFileModel},
    repository::FileRepository,
    schema::{FileEntity, FileId, FileKind, FileUpdate},
};
use crate::utils::Identity;

/// `{prefix}-{name}` with whitespace runs in the name collapsed to `-`.
fn object_key_for(prefix: impl std::fmt::Display, file_name: &str) -> String {
    let name = file_name.split_whitespace().collect::<Vec<_>>().join("-");
    format!("{}-{}", prefix, name)
}

fn content_type_for(file_name: &str) -> String {
    mime_guess::from_path(file_name).first_or_octet_stream().to_string()
}

#[derive(Clone)]
pub struct FileService {
    files: FileRepository,
    blobs: Arc<dyn BlobStore>,
    notifier: Arc<dyn Notifier>,
    storage: StorageConfig,
}

impl FileService {
    pub fn with_dependencies(
        files: FileRepository,
        blobs: Arc<dyn BlobStore>,
        notifier: Arc<dyn Notifier>,
        storage: StorageConfig,
    ) -> Self {
        info!("FileService initialized with dependencies");
        FileService { files, blobs, notifier, storage }
    }

    /// Stores the blob, records it, then asks for replication.
    ///
    /// A failed record write leaves the blob behind; a failed publish leaves
    /// both blob and record in place. Neither is rolled back.
    pub async fn upload(
        &self,
        owner: &Identity,
        model: UploadFileModel,
    ) -> Result<String, error::SystemError> {
        let (file_name, file_data) = match (model.file_name, model.file_data) {
            (Some(n), Some(d)) if !n.is_empty() && !d.is_empty() => (n, d),
            _ => return Err(error::SystemError::missing_field("fileData, fileName")),
        };
        let bytes = decode_file_data(&file_data)?;

        let id = FileId::now();
        let key = object_key_for(id.0, &file_name);
        let bucket = &self.storage.primary_bucket;

        let file_url = self.blobs.put(bucket, &key, bytes, &content_type_for(&file_name)).await?;

        let mut record = FileEntity::new(
            id,
            key.clone(),
            file_url.clone(),
            owner.email.clone(),
            model.is_public.unwrap_or(false),
        );
        if let Err(e) = self.files.create(&mut record).await {
            warn!("Blob {}/{} stored without a file record: {}", bucket, key, e);
            return Err(e);
        }
        info!("File {} uploaded by {} as {}", record.id.0, owner.email, key);

        let message = ReplicationMessage {
            source_bucket: bucket.clone(),
            object_key: key,
            destination_bucket: self.storage.replica_bucket.clone(),
        };
        self.notifier.publish(&self.storage.notify_topic, &message).await?;

        Ok(file_url)
    }

    pub async fn list_own(
        &self,
        owner: &Identity,
        kind: FileKind,
    ) -> Result<Vec<FileEntity>, error::SystemError> {
        let files: Vec<_> = self
            .files
            .find_by_owner(&owner.email)
            .await?
            .into_iter()
            .filter(|f| f.kind() == kind)
            .collect();

        if files.is_empty() {
            return Err(error::SystemError::empty_result(match kind {
                FileKind::Audio => "You have not yet uploaded any sound files",
                FileKind::Other => "No non-sound files found",
            }));
        }
        Ok(files)
    }

    pub async fn list_public(&self) -> Result<Vec<FileEntity>, error::SystemError> {
        let files: Vec<_> = self
            .files
            .find_public()
            .await?
            .into_iter()
            .filter(|f| f.kind() == FileKind::Other)
            .collect();

        if files.is_empty() {
            return Err(error::SystemError::empty_result("No public files found"));
        }
        Ok(files)
    }

    /// Renames a record and/or replaces its content.
    ///
    /// New content goes to a fresh object key and the old object is removed
    /// before the record is pointed at the new one. Records owned by someone
    /// else are reported as absent.
    pub async fn update(
        &self,
        owner: &Identity,
        model: UpdateFileModel,
    ) -> Result<FileUpdate, error::SystemError> {
        let id = model.id.ok_or_else(|| error::SystemError::missing_field("id"))?;
        if model.file_name.is_none() && model.file_data.is_none() {
            return Err(error::ValidationError::NoFieldsToUpdate.into());
        }
        let bytes = model.file_data.as_deref().map(decode_file_data).transpose()?;

        let existing = self
            .files
            .find_by_id(id)
            .await?
            .filter(|f| f.user_email == owner.email)
            .ok_or_else(|| error::SystemError::record_absent("Record not found"))?;

        let mut changes = FileUpdate { file_name: model.file_name, file_url: None };

        if let Some(bytes) = bytes {
            let bucket = &self.storage.primary_bucket;
            let name = changes.file_name.as_deref().unwrap_or(&existing.file_name);
            let key = object_key_for(Uuid::now_v7(), name);

            let file_url = self.blobs.put(bucket, &key, bytes, &content_type_for(name)).await?;

            let old_key = blob_store::object_key(&existing.file_url);
            if !old_key.is_empty() && old_key != key {
                self.blobs.delete(bucket, old_key).await?;
            }

            changes.file_name = Some(key);
            changes.file_url = Some(file_url);
        }

        match self.files.update(id, &changes).await? {
            Some(_) => {
                info!("File {} updated by {}", id.0, owner.email);
                Ok(changes)
            }
            None => {
                if let Some(url) = &changes.file_url {
                    warn!("File {} vanished during update; {} is unreferenced", id.0, url);
                }
                Err(error::SystemError::record_absent("Record not found"))
            }
        }
    }

    /// Removes every record of the caller named after the URL's object key,
    /// then the object from the primary and replica buckets.
    ///
    /// Records go first: if a blob delete fails, the records are already gone.
    pub async fn delete(
        &self,
        owner: &Identity,
        model: DeleteFileModel,
    ) -> Result<(), error::SystemError> {
        let file_url = model.file_url.ok_or_else(|| error::SystemError::missing_field("fileUrl"))?;
        let key = blob_store::object_key(&file_url);
        if key.is_empty() {
            return Err(error::SystemError::invalid_field("fileUrl must end with an object key"));
        }

        let records = self.files.find_by_owner_and_name(&owner.email, key).await?;
        if records.is_empty() {
            return Err(error::SystemError::record_absent("File record not found"));
        }

        for record in &records {
            self.files.delete(record.id).await?;
        }

        for bucket in [&self.storage.primary_bucket, &self.storage.replica_bucket] {
            if let Err(e) = self.blobs.delete(bucket, key).await {
                warn!("File record for {} deleted but blob in {} remains: {}", key, bucket, e);
                return Err(e);
            }
        }

        info!("File {} deleted by {}", key, owner.email);
        Ok(())
    }
}
