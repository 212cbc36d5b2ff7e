use serde::{Deserialize, Serialize};

use crate::api::error;

/// Asks the downstream replicator to mirror one object into another bucket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplicationMessage {
    pub source_bucket: String,
    pub object_key: String,
    pub destination_bucket: String,
}

/// Client for the external fan-out service.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(
        &self,
        topic: &str,
        message: &ReplicationMessage,
    ) -> Result<(), error::SystemError>;
}
