use actix_web::{web, HttpRequest, HttpResponse};
use async_trait::async_trait;
use serde_json::json;
use std::sync::Arc;

use super::{reply_response, CloseOnDrop, McpConnection, ServerIdentity, SessionTransport};
use crate::connectors::ApiKeyIdentity;
use crate::mcp::context::RequestContext;
use crate::mcp::processor::RequestProcessor;

/// Fresh server/transport pair per POST, torn down when the request ends
pub struct StatelessTransport {
    processor: Arc<RequestProcessor>,
    identity: ServerIdentity,
}

impl StatelessTransport {
    pub fn new(processor: Arc<RequestProcessor>, identity: ServerIdentity) -> Self {
        Self {
            processor,
            identity,
        }
    }
}

#[async_trait(?Send)]
impl SessionTransport for StatelessTransport {
    #[tracing::instrument(name = "Stateless MCP request", skip_all)]
    async fn handle_post(
        &self,
        _req: &HttpRequest,
        body: web::Bytes,
        identity: Option<ApiKeyIdentity>,
    ) -> HttpResponse {
        let body = match RequestProcessor::parse_body(&body) {
            Ok(body) => body,
            Err(error) => return HttpResponse::InternalServerError().json(error),
        };

        let connection = McpConnection::connect(self.processor.clone());
        let _teardown = CloseOnDrop(connection.clone());

        let context = RequestContext::new(identity, None);
        let processed = connection.handle(body, &context).await;

        reply_response(processed.reply, HttpResponse::Ok())
    }

    async fn handle_get(&self, _req: &HttpRequest) -> HttpResponse {
        HttpResponse::Ok().json(json!({
            "name": self.identity.name,
            "version": self.identity.version,
            "description": self.identity.description,
            "capabilities": ["tools", "resources", "prompts"],
        }))
    }

    async fn handle_delete(&self, _req: &HttpRequest) -> HttpResponse {
        HttpResponse::Ok().json(json!({ "success": true }))
    }
}
