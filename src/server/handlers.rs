//! Handlers not linked to a specific integration

use ntex::web;
use serde_json::json;

use crate::server::errors;

/// Liveness probe for the load balancer
#[web::get("/health")]
pub async fn health() -> impl web::Responder {
    web::HttpResponse::Ok().json(&json!({ "status": "ok" }))
}

/// Return a [UrlNotFound](errors::UserError::UrlNotFound) error for urls not defined
pub async fn serve_not_found() -> Result<web::HttpResponse, web::Error> {
    Err(errors::UserError::UrlNotFound.into())
}
