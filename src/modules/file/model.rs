use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use validator::{Validate, ValidationError};

use crate::{
    api::error,
    modules::file::schema::{FileEntity, FileId, FileUpdate},
};

/// File names become part of an object key, so they must stay a single path segment.
fn validate_file_name(name: &str) -> Result<(), ValidationError> {
    if name.contains(['/', '\\']) || name.trim().is_empty() {
        return Err(ValidationError::new("file_name")
            .with_message(Cow::Borrowed("fileName must not contain path separators")));
    }
    Ok(())
}

pub fn decode_file_data(data: &str) -> Result<Vec<u8>, error::SystemError> {
    general_purpose::STANDARD
        .decode(data.trim())
        .map_err(|_| error::SystemError::invalid_field("fileData must be valid base64"))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UploadFileModel {
    #[serde(rename = "fileName")]
    #[validate(required, length(min = 1), custom(function = "validate_file_name"))]
    pub file_name: Option<String>,
    #[serde(rename = "fileData")]
    #[validate(required, length(min = 1))]
    pub file_data: Option<String>,
    #[serde(rename = "isPublic")]
    pub is_public: Option<bool>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFileModel {
    #[validate(required)]
    pub id: Option<FileId>,
    #[serde(rename = "fileName")]
    #[validate(length(min = 1), custom(function = "validate_file_name"))]
    pub file_name: Option<String>,
    #[serde(rename = "fileData")]
    #[validate(length(min = 1))]
    pub file_data: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct DeleteFileModel {
    #[serde(rename = "fileUrl")]
    #[validate(required, length(min = 1))]
    pub file_url: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadFileResponse {
    pub file_url: String,
}

#[derive(Serialize)]
pub struct FileListResponse {
    pub files: Vec<FileEntity>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileResponse {
    pub updated_attributes: FileUpdate,
}
