use actix_web::{
    middleware::from_fn,
    web::{scope, ServiceConfig},
};

use crate::middlewares::authentication;

pub mod file;
pub mod user {
    pub mod handle;
    pub mod model;
    pub mod repository;
    pub mod route;
    pub mod schema;
    pub mod service;
}

/// `/api/auth/*` is public; every other `/api` route requires a bearer token.
pub fn configure(cfg: &mut ServiceConfig) {
    cfg.service(
        scope("/api").configure(user::route::public_api_configure).service(
            scope("").wrap(from_fn(authentication)).configure(file::route::configure),
        ),
    );
}
