pub mod blob_store;
pub mod blob_store_local;
pub mod notification;
pub mod notification_redis;
pub mod record_store;
pub mod record_store_pg;

pub use blob_store::BlobStore;
pub use blob_store_local::BlobStoreLocal;
pub use notification::{Notifier, ReplicationMessage};
pub use notification_redis::NotifierRedis;
pub use record_store::{Filter, Item, RecordKey, RecordStore};
pub use record_store_pg::RecordStorePg;
