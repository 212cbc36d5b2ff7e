use std::sync::Arc;

use crate::{
    api::error,
    clients::{Filter, Item, RecordStore},
    modules::file::schema::{FileEntity, FileId, FileUpdate},
};

/// How many consecutive ids an upload may try when its millisecond id is taken.
const ID_ATTEMPTS: i64 = 16;

/// Typed access to the Files table.
#[derive(Clone)]
pub struct FileRepository {
    store: Arc<dyn RecordStore>,
    table: String,
}

fn decode_all(items: Vec<Item>) -> Result<Vec<FileEntity>, error::SystemError> {
    items.into_iter().map(FileEntity::from_item).collect()
}

impl FileRepository {
    pub fn new(store: Arc<dyn RecordStore>, table: impl Into<String>) -> Self {
        Self { store, table: table.into() }
    }

    /// Inserts `file`, moving its id forward past any record created in the same millisecond.
    pub async fn create(&self, file: &mut FileEntity) -> Result<(), error::SystemError> {
        let first = file.id;
        for offset in 0..ID_ATTEMPTS {
            file.id = FileId(first.0 + offset);
            if self.store.put_new(&self.table, &file.id.key(), file.to_item()?).await? {
                return Ok(());
            }
        }
        Err(error::DependencyError::StoreUnavailable(format!(
            "no free file id in {}..{}",
            first.0,
            first.0 + ID_ATTEMPTS
        ))
        .into())
    }

    pub async fn find_by_id(&self, id: FileId) -> Result<Option<FileEntity>, error::SystemError> {
        self.store.get(&self.table, &id.key()).await?.map(FileEntity::from_item).transpose()
    }

    pub async fn find_by_owner(&self, email: &str) -> Result<Vec<FileEntity>, error::SystemError> {
        let filter = Filter::new().eq("userEmail", email);
        decode_all(self.store.scan(&self.table, &filter).await?)
    }

    pub async fn find_public(&self) -> Result<Vec<FileEntity>, error::SystemError> {
        let filter = Filter::new().eq("isPublic", true);
        decode_all(self.store.scan(&self.table, &filter).await?)
    }

    pub async fn find_by_owner_and_name(
        &self,
        email: &str,
        file_name: &str,
    ) -> Result<Vec<FileEntity>, error::SystemError> {
        let filter = Filter::new().eq("userEmail", email).eq("fileName", file_name);
        decode_all(self.store.scan(&self.table, &filter).await?)
    }

    /// Applies only the fields present in `changes`. `None` if the record is gone.
    pub async fn update(
        &self,
        id: FileId,
        changes: &FileUpdate,
    ) -> Result<Option<FileEntity>, error::SystemError> {
        self.store
            .update(&self.table, &id.key(), changes.to_item()?)
            .await?
            .map(FileEntity::from_item)
            .transpose()
    }

    pub async fn delete(&self, id: FileId) -> Result<(), error::SystemError> {
        self.store.delete(&self.table, &id.key()).await
    }
}
