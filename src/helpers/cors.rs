use actix_web::middleware::DefaultHeaders;

pub const ALLOWED_METHODS: &str = "GET, POST, DELETE, OPTIONS";
pub const ALLOWED_HEADERS: &str = "Content-Type, Authorization, mcp-session-id";

/// CORS headers stamped on every response
pub fn default_headers(exposed: &[&str]) -> DefaultHeaders {
    let headers = DefaultHeaders::new()
        .add(("Access-Control-Allow-Origin", "*"))
        .add(("Access-Control-Allow-Methods", ALLOWED_METHODS))
        .add(("Access-Control-Allow-Headers", ALLOWED_HEADERS));

    if exposed.is_empty() {
        headers
    } else {
        headers.add(("Access-Control-Expose-Headers", exposed.join(", ")))
    }
}
