use actix_web::{
    body::{EitherBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    http::{header, Method},
    middleware::Next,
    web, Error, HttpMessage, HttpRequest, HttpResponse, ResponseError,
};

use crate::{
    api::{cors, error},
    configs::AuthConfig,
    utils,
};

/// Answers CORS preflight requests before anything else runs.
pub async fn preflight<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    B: MessageBody + 'static,
{
    if req.method() == Method::OPTIONS {
        let mut res = HttpResponse::Ok();
        cors::apply(&mut res);
        let res = res.json(serde_json::json!({ "message": "CORS preflight response" }));
        return Ok(req.into_response(res).map_into_right_body());
    }

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}

/// Rejects the request with 401/400 unless it carries a valid bearer token,
/// otherwise stores the caller's [`utils::Identity`] in the request extensions.
pub async fn authentication<B>(
    req: ServiceRequest,
    next: Next<B>,
) -> Result<ServiceResponse<EitherBody<B>>, Error>
where
    B: MessageBody + 'static,
{
    let Some(config) = req.app_data::<web::Data<AuthConfig>>().cloned() else {
        let err = error::Error::internal_server_error("authentication is not configured");
        return Ok(req.into_response(err.error_response()).map_into_right_body());
    };

    let auth = req.headers().get(header::AUTHORIZATION).and_then(|h| h.to_str().ok());
    let identity = match utils::authenticate(auth, config.jwt_secret.as_bytes()) {
        Ok(identity) => identity,
        Err(e) => {
            log::info!("Rejected {} {}: {}", req.method(), req.path(), e);
            let err = error::Error::from(error::SystemError::from(e));
            return Ok(req.into_response(err.error_response()).map_into_right_body());
        }
    };

    req.extensions_mut().insert(identity);

    next.call(req).await.map(ServiceResponse::map_into_left_body)
}

pub fn get_extensions<T>(req: &HttpRequest) -> Result<T, error::Error>
where
    T: Clone + 'static,
{
    let extensions = req.extensions();

    let value = extensions
        .get::<T>()
        .ok_or_else(|| error::Error::unauthorized("Unauthorized: No token provided"))?
        .clone();

    Ok(value)
}
