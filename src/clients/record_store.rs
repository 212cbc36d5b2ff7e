use serde::{de::DeserializeOwned, ser::Error as _, Serialize};
use serde_json::{Map, Value};

use crate::api::error;

/// A record as the store holds it: a flat JSON object.
pub type Item = Map<String, Value>;

/// Converts a typed record into the store's representation.
pub fn to_item<T: Serialize>(record: &T) -> Result<Item, error::SystemError> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        _ => Err(serde_json::Error::custom("record must serialize to an object").into()),
    }
}

/// Converts a stored item back into its typed record.
pub fn from_item<T: DeserializeOwned>(item: Item) -> Result<T, error::SystemError> {
    Ok(serde_json::from_value(Value::Object(item))?)
}

/// Primary key of a record. Users are keyed by a string (email), files by a number (id).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordKey {
    S(String),
    N(i64),
}

impl RecordKey {
    /// Text form used as the storage column value.
    pub fn as_text(&self) -> String {
        match self {
            RecordKey::S(s) => s.clone(),
            RecordKey::N(n) => n.to_string(),
        }
    }
}

/// Conjunction of attribute equality predicates, evaluated by the store during a scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Item,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn eq(mut self, attribute: &str, value: impl Into<Value>) -> Self {
        self.conditions.insert(attribute.to_string(), value.into());
        self
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.conditions.iter().all(|(k, v)| item.get(k) == Some(v))
    }

    pub fn to_json(&self) -> Value {
        Value::Object(self.conditions.clone())
    }
}

/// Client for the external key-value record store.
///
/// `scan` reads the whole table on every call. That is O(table size) and the
/// scalability ceiling of every listing and of delete; there is no index path.
#[async_trait::async_trait]
pub trait RecordStore: Send + Sync {
    async fn get(&self, table: &str, key: &RecordKey) -> Result<Option<Item>, error::SystemError>;

    /// Inserts only when the key is free. Returns `false` if a record already exists.
    async fn put_new(
        &self,
        table: &str,
        key: &RecordKey,
        item: Item,
    ) -> Result<bool, error::SystemError>;

    /// Merges `fields` into an existing record, leaving other attributes untouched.
    /// Returns the updated record, or `None` if the key is absent.
    async fn update(
        &self,
        table: &str,
        key: &RecordKey,
        fields: Item,
    ) -> Result<Option<Item>, error::SystemError>;

    /// All records matching `filter`, in insertion order.
    async fn scan(&self, table: &str, filter: &Filter) -> Result<Vec<Item>, error::SystemError>;

    /// Deleting an absent key is not an error.
    async fn delete(&self, table: &str, key: &RecordKey) -> Result<(), error::SystemError>;
}
