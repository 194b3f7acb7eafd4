//! Discovery documents for clients that probe for OAuth before using a key.

use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::configuration::Settings;

fn base_url(settings: &Settings) -> &str {
    settings.server.public_url.trim_end_matches('/')
}

pub async fn protected_resource(settings: web::Data<Settings>) -> HttpResponse {
    let base = base_url(&settings);
    HttpResponse::Ok().json(json!({
        "resource": format!("{}{}", base, settings.mcp_path),
        "bearer_methods_supported": ["header"],
        "resource_documentation": format!("{}/docs", base),
    }))
}

/// Minimal RFC 8414 metadata; tokens are API keys, not OAuth grants
pub async fn authorization_server(settings: web::Data<Settings>) -> HttpResponse {
    let base = base_url(&settings);
    HttpResponse::Ok().json(json!({
        "issuer": base,
        "token_endpoint": format!("{}/api/token", base),
        "response_types_supported": [],
        "grant_types_supported": [],
        "token_endpoint_auth_methods_supported": ["none"],
    }))
}

pub async fn token() -> HttpResponse {
    HttpResponse::BadRequest().json(json!({
        "error": "invalid_grant",
        "error_description": "OAuth is not supported. Use an API key: Authorization: Bearer YOUR_API_KEY",
    }))
}
