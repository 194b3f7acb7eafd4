use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::configuration::Settings;

pub async fn health_check(settings: web::Data<Settings>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "status": "ok",
        "name": settings.server.name,
        "version": settings.server.version,
    }))
}
