mod connection;
mod stateful;
mod stateless;

pub use connection::{CloseOnDrop, McpConnection};
pub use stateful::{SessionIdGenerator, StatefulTransport};
pub use stateless::StatelessTransport;

use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, HttpResponseBuilder};
use async_trait::async_trait;
use serde::Serialize;

use crate::connectors::ApiKeyIdentity;
use crate::mcp::processor::Reply;

pub const SESSION_HEADER: &str = "mcp-session-id";

/// How requests on the MCP endpoint map onto protocol sessions.
///
/// Handlers run on the actix worker that owns the request, so the returned
/// futures need not be `Send`.
#[async_trait(?Send)]
pub trait SessionTransport: Send + Sync {
    async fn handle_post(
        &self,
        req: &HttpRequest,
        body: web::Bytes,
        identity: Option<ApiKeyIdentity>,
    ) -> HttpResponse;

    async fn handle_get(&self, req: &HttpRequest) -> HttpResponse;

    async fn handle_delete(&self, req: &HttpRequest) -> HttpResponse;

    /// Extra response headers CORS must expose
    fn exposed_headers(&self) -> &'static [&'static str] {
        &[]
    }
}

/// Server identity advertised outside the protocol exchange
#[derive(Debug, Clone, Serialize)]
pub struct ServerIdentity {
    pub name: String,
    pub version: String,
    pub description: String,
}

pub(crate) fn session_header(req: &HttpRequest) -> Option<&str> {
    req.headers()
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

pub(crate) fn reply_response(reply: Reply, mut builder: HttpResponseBuilder) -> HttpResponse {
    match reply {
        Reply::Single(response) => builder.json(response),
        Reply::Batch(responses) => builder.json(responses),
        Reply::NoBody => builder.status(StatusCode::NO_CONTENT).finish(),
    }
}
