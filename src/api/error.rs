use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use deadpool_redis::{redis::RedisError, CreatePoolError, PoolError};
use std::borrow::Cow;

use crate::api::cors;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Bad Request: {0}")]
    BadRequest(Cow<'static, str>),
    #[error("Unauthorized: {message}")]
    Unauthorized { message: Cow<'static, str>, detail: Option<String> },
    #[error("Not Found: {0}")]
    NotFound(Cow<'static, str>),
    #[error("Internal Server Error")]
    InternalServer { detail: Option<String> },
}

#[derive(serde::Serialize)]
pub struct ErrorBody {
    pub message: Cow<'static, str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Error {
    pub fn unauthorized(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Unauthorized { message: msg.into(), detail: None }
    }

    pub fn not_found(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal_server_error(detail: impl Into<String>) -> Self {
        Self::InternalServer { detail: Some(detail.into()) }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match *self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::InternalServer { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let mut res = HttpResponse::build(self.status_code());
        cors::apply(&mut res);

        match self {
            Error::NotFound(msg) | Error::BadRequest(msg) => {
                res.json(ErrorBody { message: msg.clone(), error: None })
            }
            Error::Unauthorized { message, detail } => {
                res.json(ErrorBody { message: message.clone(), error: detail.clone() })
            }
            Error::InternalServer { detail } => res.json(ErrorBody {
                message: "Internal Server Error".into(),
                error: detail.clone(),
            }),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AuthError {
    #[error("Unauthorized: No token provided")]
    MissingToken,
    #[error("Unauthorized: Invalid token")]
    InvalidToken(String),
    #[error("Invalid token payload: Email missing")]
    MissingEmailClaim,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field(s): {0}")]
    MissingField(Cow<'static, str>),
    #[error("At least one of fileName or fileData is required")]
    NoFieldsToUpdate,
    #[error("{0}")]
    InvalidField(Cow<'static, str>),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum NotFoundError {
    #[error("{0}")]
    RecordAbsent(Cow<'static, str>),
    #[error("{0}")]
    EmptyResultSet(Cow<'static, str>),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ConflictError {
    #[error("Email already exists")]
    DuplicateUser,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CredentialError {
    #[error("Invalid email or password")]
    InvalidCredentials,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DependencyError {
    #[error("Record store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Blob operation failed: {0}")]
    BlobOpFailed(String),
    #[error("Notification failed: {0}")]
    NotifyFailed(String),
}

#[derive(thiserror::Error, Debug)]
pub enum SystemError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotFound(#[from] NotFoundError),
    #[error(transparent)]
    Conflict(#[from] ConflictError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
    #[error(transparent)]
    Dependency(#[from] DependencyError),
    // argon2 errors
    #[error("Hash Error: {0}")]
    HashError(#[from] argon2::password_hash::Error),
    // jwt errors outside of verification (signing)
    #[error("JWT Error: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
    // record (de)serialization
    #[error("Record Error: {0}")]
    RecordError(#[from] serde_json::Error),
}

impl From<SystemError> for Error {
    fn from(value: SystemError) -> Self {
        match value {
            SystemError::Auth(AuthError::InvalidToken(detail)) => Error::Unauthorized {
                message: "Unauthorized: Invalid token".into(),
                detail: Some(detail),
            },
            SystemError::Auth(AuthError::MissingEmailClaim) => {
                Error::BadRequest(AuthError::MissingEmailClaim.to_string().into())
            }
            SystemError::Auth(e) => Error::unauthorized(e.to_string()),
            SystemError::Validation(e) => Error::BadRequest(e.to_string().into()),
            SystemError::NotFound(e) => Error::NotFound(e.to_string().into()),
            SystemError::Conflict(e) => Error::BadRequest(e.to_string().into()),
            SystemError::Credential(e) => Error::unauthorized(e.to_string()),
            other => {
                log::error!("Internal Server Error: {:?}", other);
                Error::internal_server_error(other.to_string())
            }
        }
    }
}

impl From<sqlx::Error> for SystemError {
    fn from(err: sqlx::Error) -> Self {
        log::error!("{:?}", err);
        SystemError::Dependency(DependencyError::StoreUnavailable(err.to_string()))
    }
}

impl From<sqlx::migrate::MigrateError> for SystemError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        SystemError::Dependency(DependencyError::StoreUnavailable(err.to_string()))
    }
}

impl From<std::io::Error> for SystemError {
    fn from(err: std::io::Error) -> Self {
        SystemError::Dependency(DependencyError::BlobOpFailed(err.to_string()))
    }
}

impl From<CreatePoolError> for SystemError {
    fn from(err: CreatePoolError) -> Self {
        SystemError::Dependency(DependencyError::NotifyFailed(err.to_string()))
    }
}

impl From<PoolError> for SystemError {
    fn from(err: PoolError) -> Self {
        SystemError::Dependency(DependencyError::NotifyFailed(err.to_string()))
    }
}

impl From<RedisError> for SystemError {
    fn from(err: RedisError) -> Self {
        SystemError::Dependency(DependencyError::NotifyFailed(err.to_string()))
    }
}

impl SystemError {
    pub fn missing_field(fields: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation(ValidationError::MissingField(fields.into()))
    }

    pub fn invalid_field(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::Validation(ValidationError::InvalidField(msg.into()))
    }

    pub fn record_absent(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(NotFoundError::RecordAbsent(msg.into()))
    }

    pub fn empty_result(msg: impl Into<Cow<'static, str>>) -> Self {
        Self::NotFound(NotFoundError::EmptyResultSet(msg.into()))
    }
}
