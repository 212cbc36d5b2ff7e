use std::str::FromStr;

pub const CORS_ALLOW_ORIGIN: &str = "*";
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS";
pub const CORS_ALLOW_HEADERS: &str = "Content-Type, Authorization";

pub const AUDIO_EXTENSIONS: [&str; 3] = [".mp3", ".wav", ".ogg"];

#[derive(thiserror::Error, Debug)]
pub enum EnvError {
    #[error("{0} must be set in .env file or environment variable")]
    Missing(&'static str),
    #[error("{0} has an invalid value: {1}")]
    Invalid(&'static str, String),
}

#[derive(Debug, Clone)]
pub struct Env {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
    pub region: String,
    pub blob_endpoint: String,
    pub blob_root: String,
    pub files_table: String,
    pub users_table: String,
    pub primary_bucket: String,
    pub replica_bucket: String,
    pub notify_topic: String,
    pub database_url: String,
    pub redis_url: String,
    pub max_upload_bytes: usize,
    pub ip: String,
    pub port: u16,
}

fn required(key: &'static str) -> Result<String, EnvError> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(EnvError::Missing(key)),
    }
}

fn or_default(key: &'static str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed<T: FromStr>(key: &'static str, default: &str) -> Result<T, EnvError> {
    let raw = or_default(key, default);
    raw.parse::<T>().map_err(|_| EnvError::Invalid(key, raw))
}

impl Env {
    pub fn from_env() -> Result<Self, EnvError> {
        let region = or_default("REGION", "us-west-1");
        let blob_endpoint = std::env::var("BLOB_ENDPOINT")
            .unwrap_or_else(|_| format!("s3.{}.amazonaws.com", region));

        Ok(Env {
            jwt_secret: required("SECRET_KEY")?,
            access_token_expiration: parsed("ACCESS_TOKEN_EXPIRATION", "3600")?,
            region,
            blob_endpoint,
            blob_root: or_default("BLOB_ROOT", "./blobs"),
            files_table: or_default("FILES_TABLE", "Files"),
            users_table: or_default("USERS_TABLE", "Users"),
            primary_bucket: required("PRIMARY_BUCKET")?,
            replica_bucket: required("REPLICA_BUCKET")?,
            notify_topic: required("NOTIFY_TOPIC")?,
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            max_upload_bytes: parsed("MAX_UPLOAD_BYTES", "10485760")?,
            ip: or_default("IP", "127.0.0.1"),
            port: parsed("PORT", "8080")?,
        })
    }
}
