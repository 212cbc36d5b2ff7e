use actix_web::HttpResponseBuilder;

use crate::constants::{CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN};

/// Stamps the fixed CORS header set onto a response under construction.
pub fn apply(res: &mut HttpResponseBuilder) {
    res.insert_header(("Access-Control-Allow-Origin", CORS_ALLOW_ORIGIN));
    res.insert_header(("Access-Control-Allow-Methods", CORS_ALLOW_METHODS));
    res.insert_header(("Access-Control-Allow-Headers", CORS_ALLOW_HEADERS));
}
