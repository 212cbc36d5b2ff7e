use deadpool_redis::redis::AsyncCommands;

use crate::{
    api::error,
    clients::notification::{Notifier, ReplicationMessage},
};

/// Publishes notifications on Redis pub/sub channels named after the topic.
#[derive(Clone)]
pub struct NotifierRedis {
    pool: deadpool_redis::Pool,
}

impl NotifierRedis {
    pub fn new(pool: deadpool_redis::Pool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Notifier for NotifierRedis {
    async fn publish(
        &self,
        topic: &str,
        message: &ReplicationMessage,
    ) -> Result<(), error::SystemError> {
        let mut conn = self.pool.get().await?;
        let payload = serde_json::to_string(message)?;

        let receivers: i64 = conn.publish(topic, payload).await?;
        log::info!(
            "Published replication of {} to {} ({} receivers)",
            message.object_key,
            topic,
            receivers
        );
        Ok(())
    }
}
