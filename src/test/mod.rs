//! In-memory stand-ins for the external services and a harness wiring them into the app.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::{
    api::error,
    clients::{
        blob_store, BlobStore, Filter, Item, Notifier, RecordKey, RecordStore, ReplicationMessage,
    },
    configs::{AuthConfig, StorageConfig},
    modules::{
        file::{FileRepository, FileService},
        user::{repository::UserRepository, service::UserService},
    },
    utils::Claims,
    AppState,
};


pub const SECRET: &str = "test-secret";
pub const PRIMARY: &str = "primary-bucket";
pub const REPLICA: &str = "replica-bucket";
pub const TOPIC: &str = "replication";
pub const ENDPOINT: &str = "s3.test-region.example";

#[derive(Default)]
pub struct MemoryRecordStore {
    tables: Mutex<HashMap<String, Vec<(String, Item)>>>,
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl MemoryRecordStore {
    fn begin(&self) -> Result<(), error::SystemError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            let offline = error::DependencyError::StoreUnavailable("record store offline".into());
            return Err(offline.into());
        }
        Ok(())
    }

    pub fn all(&self, table: &str) -> Vec<Item> {
        let tables = self.tables.lock().unwrap();
        tables
            .get(table)
            .map(|rows| rows.iter().map(|(_, i)| i.clone()).collect())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl RecordStore for MemoryRecordStore {
    async fn get(&self, table: &str, key: &RecordKey) -> Result<Option<Item>, error::SystemError> {
        self.begin()?;
        let tables = self.tables.lock().unwrap();
        let key = key.as_text();
        Ok(tables
            .get(table)
            .and_then(|rows| rows.iter().find(|(k, _)| *k == key))
            .map(|(_, i)| i.clone()))
    }

    async fn put_new(
        &self,
        table: &str,
        key: &RecordKey,
        item: Item,
    ) -> Result<bool, error::SystemError> {
        self.begin()?;
        let mut tables = self.tables.lock().unwrap();
        let rows = tables.entry(table.to_string()).or_default();
        let key = key.as_text();
        if rows.iter().any(|(k, _)| *k == key) {
            return Ok(false);
        }
        rows.push((key, item));
        Ok(true)
    }

    async fn update(
        &self,
        table: &str,
        key: &RecordKey,
        fields: Item,
    ) -> Result<Option<Item>, error::SystemError> {
        self.begin()?;
        let mut tables = self.tables.lock().unwrap();
        let key = key.as_text();
        let row = tables.get_mut(table).and_then(|rows| rows.iter_mut().find(|(k, _)| *k == key));
        let Some(row) = row else {
            return Ok(None);
        };
        row.1.extend(fields);
        Ok(Some(row.1.clone()))
    }

    async fn scan(&self, table: &str, filter: &Filter) -> Result<Vec<Item>, error::SystemError> {
        self.begin()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .get(table)
            .map(|rows| {
                rows.iter().filter(|(_, i)| filter.matches(i)).map(|(_, i)| i.clone()).collect()
            })
            .unwrap_or_default())
    }

    async fn delete(&self, table: &str, key: &RecordKey) -> Result<(), error::SystemError> {
        self.begin()?;
        let mut tables = self.tables.lock().unwrap();
        let key = key.as_text();
        if let Some(rows) = tables.get_mut(table) {
            rows.retain(|(k, _)| *k != key);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryBlobStore {
    objects: Mutex<HashMap<(String, String), (Vec<u8>, String)>>,
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

impl MemoryBlobStore {
    pub fn contains(&self, bucket: &str, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(&(bucket.to_string(), key.to_string()))
    }

    pub fn content(&self, bucket: &str, key: &str) -> Option<(Vec<u8>, String)> {
        self.objects.lock().unwrap().get(&(bucket.to_string(), key.to_string())).cloned()
    }

    pub fn len(&self) -> usize {
        self.objects.lock().unwrap().len()
    }
}

#[async_trait::async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<String, error::SystemError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(error::DependencyError::BlobOpFailed("blob store offline".into()).into());
        }
        self.objects
            .lock()
            .unwrap()
            .insert((bucket.to_string(), key.to_string()), (bytes, content_type.to_string()));
        Ok(blob_store::object_url(bucket, ENDPOINT, key))
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), error::SystemError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(error::DependencyError::BlobOpFailed("blob store offline".into()).into());
        }
        self.objects.lock().unwrap().remove(&(bucket.to_string(), key.to_string()));
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryNotifier {
    pub published: Mutex<Vec<(String, ReplicationMessage)>>,
    pub calls: AtomicUsize,
    pub fail: AtomicBool,
}

#[async_trait::async_trait]
impl Notifier for MemoryNotifier {
    async fn publish(
        &self,
        topic: &str,
        message: &ReplicationMessage,
    ) -> Result<(), error::SystemError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(error::DependencyError::NotifyFailed("fan-out offline".into()).into());
        }
        self.published.lock().unwrap().push((topic.to_string(), message.clone()));
        Ok(())
    }
}

pub struct Harness {
    pub records: Arc<MemoryRecordStore>,
    pub blobs: Arc<MemoryBlobStore>,
    pub notifier: Arc<MemoryNotifier>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        let records = Arc::new(MemoryRecordStore::default());
        let blobs = Arc::new(MemoryBlobStore::default());
        let notifier = Arc::new(MemoryNotifier::default());

        let auth = AuthConfig { jwt_secret: SECRET.into(), access_token_expiration: 3600 };
        let storage = StorageConfig {
            files_table: "Files".into(),
            users_table: "Users".into(),
            primary_bucket: PRIMARY.into(),
            replica_bucket: REPLICA.into(),
            notify_topic: TOPIC.into(),
        };

        let state = AppState {
            user_service: UserService::with_dependencies(
                UserRepository::new(records.clone(), storage.users_table.clone()),
                auth.clone(),
            ),
            file_service: FileService::with_dependencies(
                FileRepository::new(records.clone(), storage.files_table.clone()),
                blobs.clone(),
                notifier.clone(),
                storage,
            ),
            auth,
            max_upload_bytes: 1024 * 1024,
        };

        Self { records, blobs, notifier, state }
    }

    pub fn bearer(&self, email: &str) -> String {
        let token = Claims::new(email, 3600).encode(SECRET.as_bytes()).unwrap();
        format!("Bearer {}", token)
    }

    /// Calls made to any of the three external services so far.
    pub fn external_calls(&self) -> usize {
        self.records.calls.load(Ordering::SeqCst)
            + self.blobs.calls.load(Ordering::SeqCst)
            + self.notifier.calls.load(Ordering::SeqCst)
    }
}
