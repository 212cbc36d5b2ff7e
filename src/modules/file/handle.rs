use actix_web::{delete, get, post, put, web, HttpRequest};

use crate::{
    api::{error, success},
    middlewares::get_extensions,
    modules::file::{
        model::{
            DeleteFileModel, FileListResponse, UpdateFileModel, UpdateFileResponse,
            UploadFileModel, UploadFileResponse,
        },
        schema::FileKind,
        service::FileService,
    },
    utils::{Identity, ValidatedJson},
};

#[post("")]
pub async fn upload_file(
    file_service: web::Data<FileService>,
    body: ValidatedJson<UploadFileModel>,
    req: HttpRequest,
) -> Result<success::Success<UploadFileResponse>, error::Error> {
    let owner = get_extensions::<Identity>(&req)?;
    let file_url = file_service.upload(&owner, body.0).await?;
    Ok(success::Success::ok(Some(UploadFileResponse { file_url }))
        .message("File uploaded and details saved successfully"))
}

#[get("/audio")]
pub async fn list_audio_files(
    file_service: web::Data<FileService>,
    req: HttpRequest,
) -> Result<success::Success<FileListResponse>, error::Error> {
    let owner = get_extensions::<Identity>(&req)?;
    let files = file_service.list_own(&owner, FileKind::Audio).await?;
    Ok(success::Success::ok(Some(FileListResponse { files })))
}

#[get("/other")]
pub async fn list_other_files(
    file_service: web::Data<FileService>,
    req: HttpRequest,
) -> Result<success::Success<FileListResponse>, error::Error> {
    let owner = get_extensions::<Identity>(&req)?;
    let files = file_service.list_own(&owner, FileKind::Other).await?;
    Ok(success::Success::ok(Some(FileListResponse { files })))
}

/// Still behind authentication even though the listing is not per-user.
#[get("/public")]
pub async fn list_public_files(
    file_service: web::Data<FileService>,
) -> Result<success::Success<FileListResponse>, error::Error> {
    let files = file_service.list_public().await?;
    Ok(success::Success::ok(Some(FileListResponse { files })))
}

#[put("")]
pub async fn update_file(
    file_service: web::Data<FileService>,
    body: ValidatedJson<UpdateFileModel>,
    req: HttpRequest,
) -> Result<success::Success<UpdateFileResponse>, error::Error> {
    let owner = get_extensions::<Identity>(&req)?;
    let updated_attributes = file_service.update(&owner, body.0).await?;
    Ok(success::Success::ok(Some(UpdateFileResponse { updated_attributes }))
        .message("File record updated successfully"))
}

#[delete("")]
pub async fn delete_file(
    file_service: web::Data<FileService>,
    body: ValidatedJson<DeleteFileModel>,
    req: HttpRequest,
) -> Result<success::Success<()>, error::Error> {
    let owner = get_extensions::<Identity>(&req)?;
    file_service.delete(&owner, body.0).await?;
    Ok(success::Success::ok(None).message("File deleted successfully"))
}
