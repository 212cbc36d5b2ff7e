use deadpool_redis::Runtime;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{api::error, constants::Env};

pub async fn connect_database(env: &Env) -> Result<PgPool, error::SystemError> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .min_connections(1)
        .acquire_slow_threshold(std::time::Duration::from_secs(3))
        .connect(&env.database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    Ok(pool)
}

pub fn connect_redis(env: &Env) -> Result<deadpool_redis::Pool, error::SystemError> {
    let mut cfg = deadpool_redis::Config::from_url(&env.redis_url);
    cfg.pool = Some(deadpool_redis::PoolConfig { max_size: 16, ..Default::default() });
    let pool = cfg.create_pool(Some(Runtime::Tokio1))?;
    Ok(pool)
}

/// Signing parameters shared by login and the authentication middleware.
#[derive(Debug, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub access_token_expiration: u64,
}

/// Names of the tables, buckets and topic the file handlers operate on.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub files_table: String,
    pub users_table: String,
    pub primary_bucket: String,
    pub replica_bucket: String,
    pub notify_topic: String,
}

impl From<&Env> for AuthConfig {
    fn from(env: &Env) -> Self {
        Self {
            jwt_secret: env.jwt_secret.clone(),
            access_token_expiration: env.access_token_expiration,
        }
    }
}

impl From<&Env> for StorageConfig {
    fn from(env: &Env) -> Self {
        Self {
            files_table: env.files_table.clone(),
            users_table: env.users_table.clone(),
            primary_bucket: env.primary_bucket.clone(),
            replica_bucket: env.replica_bucket.clone(),
            notify_topic: env.notify_topic.clone(),
        }
    }
}
