use chrono::{DateTime, Utc};
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};

use crate::{
    api::error,
    clients::record_store::{self, Item, RecordKey},
    constants::AUDIO_EXTENSIONS,
};

/// Numeric primary key of a file record.
///
/// This is the only place ids change representation: requests may carry the
/// id as a JSON number or as a numeric string, records always store a number,
/// and the record-store key is always [`RecordKey::N`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct FileId(pub i64);

impl FileId {
    /// Millisecond timestamp, the id a freshly uploaded file receives.
    pub fn now() -> Self {
        FileId(Utc::now().timestamp_millis())
    }

    pub fn key(self) -> RecordKey {
        RecordKey::N(self.0)
    }
}

impl<'de> Deserialize<'de> for FileId {
    fn deserialize<D>(de: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            N(i64),
            S(String),
        }

        match Raw::deserialize(de)? {
            Raw::N(n) => Ok(FileId(n)),
            Raw::S(s) => s
                .trim()
                .parse::<i64>()
                .map(FileId)
                .map_err(|_| D::Error::custom(format!("invalid file id {:?}", s))),
        }
    }
}

/// A row of the Files table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntity {
    pub id: FileId,
    pub file_name: String,
    pub file_url: String,
    pub user_email: String,
    #[serde(default)]
    pub is_public: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FileEntity {
    pub fn new(
        id: FileId,
        file_name: String,
        file_url: String,
        user_email: String,
        is_public: bool,
    ) -> Self {
        let now = Utc::now();
        Self { id, file_name, file_url, user_email, is_public, created_at: now, updated_at: now }
    }

    pub fn to_item(&self) -> Result<Item, error::SystemError> {
        record_store::to_item(self)
    }

    pub fn from_item(item: Item) -> Result<Self, error::SystemError> {
        record_store::from_item(item)
    }

    pub fn kind(&self) -> FileKind {
        FileKind::of(&self.file_url)
    }
}

/// The attributes an update may change. Absent fields are left as stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_url: Option<String>,
}

impl FileUpdate {
    pub fn is_empty(&self) -> bool {
        self.file_name.is_none() && self.file_url.is_none()
    }

    pub fn to_item(&self) -> Result<Item, error::SystemError> {
        record_store::to_item(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Audio,
    Other,
}

impl FileKind {
    /// Classifies by the URL's extension, case-insensitively.
    pub fn of(url: &str) -> Self {
        let url = url.to_ascii_lowercase();
        if AUDIO_EXTENSIONS.iter().any(|ext| url.ends_with(ext)) {
            FileKind::Audio
        } else {
            FileKind::Other
        }
    }
}
