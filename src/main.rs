use actix_web::{
    self,
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    middleware::{from_fn, Logger},
    web, App, HttpResponse, HttpServer,
};
use std::sync::Arc;

use crate::{
    api::{cors, error},
    clients::{
        BlobStore, BlobStoreLocal, Notifier, NotifierRedis, RecordStore, RecordStorePg,
    },
    configs::{connect_database, connect_redis, AuthConfig, StorageConfig},
    constants::Env,
    middlewares::preflight,
    modules::{
        file::{FileRepository, FileService},
        user::{repository::UserRepository, service::UserService},
    },
};

mod api;
mod clients;
mod configs;
mod constants;
mod middlewares;
mod modules;
#[cfg(test)]
mod test;
mod utils;

/// Everything a worker needs to serve requests. Cloned once per worker.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub file_service: FileService,
    pub auth: AuthConfig,
    pub max_upload_bytes: usize,
}

#[actix_web::get("/")]
async fn health_check() -> HttpResponse {
    let mut res = HttpResponse::Ok();
    cors::apply(&mut res);
    res.body("Server is running")
}

async fn route_not_found() -> Result<HttpResponse, error::Error> {
    Err(error::Error::not_found("Route not found"))
}

pub fn build_app(
    state: &AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(from_fn(preflight))
        .wrap(Logger::default())
        .app_data(web::JsonConfig::default().limit(state.max_upload_bytes))
        .app_data(web::Data::new(state.auth.clone()))
        .app_data(web::Data::new(state.user_service.clone()))
        .app_data(web::Data::new(state.file_service.clone()))
        .service(health_check)
        .configure(modules::configure)
        .default_service(web::to(route_not_found))
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let env = Env::from_env().map_err(std::io::Error::other)?;
    log::info!("Environment loaded; blobs in {} at {}", env.region, env.blob_endpoint);

    let db_pool = connect_database(&env)
        .await
        .map_err(|e| std::io::Error::other(format!("Database connection error: {e}")))?;
    let redis_pool = connect_redis(&env)
        .map_err(|e| std::io::Error::other(format!("Redis connection error: {e}")))?;

    let records: Arc<dyn RecordStore> = Arc::new(RecordStorePg::new(db_pool));
    let blobs: Arc<dyn BlobStore> =
        Arc::new(BlobStoreLocal::new(&env.blob_root, env.blob_endpoint.clone()));
    let notifier: Arc<dyn Notifier> = Arc::new(NotifierRedis::new(redis_pool));

    let auth = AuthConfig::from(&env);
    let storage = StorageConfig::from(&env);

    let state = AppState {
        user_service: UserService::with_dependencies(
            UserRepository::new(records.clone(), storage.users_table.clone()),
            auth.clone(),
        ),
        file_service: FileService::with_dependencies(
            FileRepository::new(records, storage.files_table.clone()),
            blobs,
            notifier,
            storage,
        ),
        auth,
        max_upload_bytes: env.max_upload_bytes,
    };

    log::info!("Starting server at http://{}:{}", env.ip, env.port);
    HttpServer::new(move || build_app(&state))
        .bind((env.ip.as_str(), env.port))?
        .workers(2)
        .run()
        .await
}
