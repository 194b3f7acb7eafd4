use actix_web::{http::header, web, HttpMessage, HttpRequest, HttpResponse};
use serde_json::json;
use std::sync::Arc;

use crate::connectors::ApiKeyIdentity;
use crate::helpers::cors::ALLOWED_METHODS;
use crate::mcp::SessionTransport;

pub type Transport = web::Data<Arc<dyn SessionTransport>>;

pub async fn post_handler(req: HttpRequest, body: web::Bytes, transport: Transport) -> HttpResponse {
    let identity = req.extensions().get::<ApiKeyIdentity>().cloned();
    transport.handle_post(&req, body, identity).await
}

pub async fn get_handler(req: HttpRequest, transport: Transport) -> HttpResponse {
    transport.handle_get(&req).await
}

pub async fn delete_handler(req: HttpRequest, transport: Transport) -> HttpResponse {
    transport.handle_delete(&req).await
}

/// CORS preflight; the headers come from the app-wide defaults
pub async fn options_handler() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

pub async fn method_not_allowed() -> HttpResponse {
    HttpResponse::MethodNotAllowed()
        .insert_header((header::ALLOW, ALLOWED_METHODS))
        .json(json!({ "error": "Method not allowed" }))
}
