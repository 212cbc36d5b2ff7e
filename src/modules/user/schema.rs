use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    api::error,
    clients::record_store::{self, Item, RecordKey},
};

/// A row of the Users table. `password` holds the argon2 PHC string, never the plain text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    pub email: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserEntity {
    pub fn new(email: String, password_hash: String) -> Self {
        let now = Utc::now();
        Self { email, password: password_hash, created_at: now, updated_at: now }
    }

    pub fn key_for(email: &str) -> RecordKey {
        RecordKey::S(email.to_string())
    }

    pub fn key(&self) -> RecordKey {
        Self::key_for(&self.email)
    }

    pub fn to_item(&self) -> Result<Item, error::SystemError> {
        record_store::to_item(self)
    }

    pub fn from_item(item: Item) -> Result<Self, error::SystemError> {
        record_store::from_item(item)
    }
}
