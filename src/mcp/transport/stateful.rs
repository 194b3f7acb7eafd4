use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse};
use async_trait::async_trait;
use futures::{future, StreamExt};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;

use super::{
    reply_response, session_header, McpConnection, SessionTransport, SESSION_HEADER,
};
use crate::connectors::ApiKeyIdentity;
use crate::mcp::context::RequestContext;
use crate::mcp::processor::RequestProcessor;
use crate::mcp::protocol::JsonRpcError;
use crate::mcp::session::{McpSession, SessionStore, SessionStoreError};

pub type SessionIdGenerator = Arc<dyn Fn() -> String + Send + Sync>;

const EXPOSED_HEADERS: &[&str] = &[SESSION_HEADER];

/// Sessions keyed by `mcp-session-id`, created by a successful `initialize`
pub struct StatefulTransport {
    processor: Arc<RequestProcessor>,
    store: Arc<dyn SessionStore>,
    keep_alive: Duration,
    id_generator: SessionIdGenerator,
}

impl StatefulTransport {
    pub fn new(
        processor: Arc<RequestProcessor>,
        store: Arc<dyn SessionStore>,
        keep_alive: Duration,
    ) -> Self {
        Self {
            processor,
            store,
            keep_alive,
            id_generator: Arc::new(|| uuid::Uuid::new_v4().to_string()),
        }
    }

    pub fn with_id_generator(mut self, generator: SessionIdGenerator) -> Self {
        self.id_generator = generator;
        self
    }

    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    async fn handshake(
        &self,
        body: serde_json::Value,
        identity: Option<ApiKeyIdentity>,
    ) -> HttpResponse {
        if !RequestProcessor::contains_initialize(&body) {
            return rejection(
                StatusCode::BAD_REQUEST,
                "Bad Request: Server not initialized",
            );
        }

        let session_id = (self.id_generator)();
        let connection = McpConnection::connect(self.processor.clone());
        connection.assign_session(session_id.clone());

        let context = RequestContext::new(identity, Some(session_id.clone()));
        let processed = connection.handle(body, &context).await;

        if !processed.initialized {
            connection.close();
            return reply_response(processed.reply, HttpResponse::Ok());
        }

        let session = Arc::new(McpSession::new(session_id.clone(), connection.clone()));
        match self.store.put(session).await {
            Ok(()) => {
                tracing::info!(session = %session_id, "MCP session created");
                let mut builder = HttpResponse::Ok();
                builder.insert_header((SESSION_HEADER, session_id));
                reply_response(processed.reply, builder)
            }
            Err(SessionStoreError::AtCapacity) => {
                connection.close();
                tracing::warn!("Refusing MCP session: session table full");
                rejection(StatusCode::SERVICE_UNAVAILABLE, "Server at capacity")
            }
            Err(err) => {
                connection.close();
                tracing::error!("Failed to register MCP session: {}", err);
                rejection(StatusCode::INTERNAL_SERVER_ERROR, &err.to_string())
            }
        }
    }
}

fn rejection(status: StatusCode, message: &str) -> HttpResponse {
    HttpResponse::build(status).json(JsonRpcError::server_error(message).into_response_body())
}

#[async_trait(?Send)]
impl SessionTransport for StatefulTransport {
    #[tracing::instrument(name = "Stateful MCP request", skip_all)]
    async fn handle_post(
        &self,
        req: &HttpRequest,
        body: web::Bytes,
        identity: Option<ApiKeyIdentity>,
    ) -> HttpResponse {
        let body = match RequestProcessor::parse_body(&body) {
            Ok(body) => body,
            Err(error) => return HttpResponse::InternalServerError().json(error),
        };

        let known = match session_header(req) {
            Some(id) => self.store.get(id).await,
            None => None,
        };

        let Some(session) = known else {
            return self.handshake(body, identity).await;
        };

        session.touch();
        let context = RequestContext::new(identity, Some(session.id.clone()));
        let processed = session.connection().handle(body, &context).await;

        let mut builder = HttpResponse::Ok();
        builder.insert_header((SESSION_HEADER, session.id.as_str()));
        reply_response(processed.reply, builder)
    }

    async fn handle_get(&self, req: &HttpRequest) -> HttpResponse {
        let known = match session_header(req) {
            Some(id) => self.store.get(id).await,
            None => None,
        };

        let Some(session) = known else {
            return HttpResponse::Ok()
                .content_type("text/event-stream")
                .insert_header(("Cache-Control", "no-cache"))
                .body("event: error\ndata: No session\n\n");
        };

        session.touch();
        tracing::debug!(session = %session.id, "MCP event stream opened");

        let guard = DisconnectGuard {
            store: self.store.clone(),
            session: session.clone(),
        };
        let mut ticker = tokio::time::interval(self.keep_alive);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        let connection = session.connection().clone();
        // a DELETE or an idle eviction closes the connection and ends the stream
        let stream = IntervalStream::new(ticker)
            .take_while(move |_| future::ready(!connection.is_closed()))
            .map(move |_| {
                guard.session.touch();
                Ok::<_, std::convert::Infallible>(web::Bytes::from_static(b": keep-alive\n\n"))
            });

        HttpResponse::Ok()
            .content_type("text/event-stream")
            .insert_header(("Cache-Control", "no-cache"))
            .insert_header((SESSION_HEADER, session.id.as_str()))
            .streaming(stream)
    }

    async fn handle_delete(&self, req: &HttpRequest) -> HttpResponse {
        let removed = match session_header(req) {
            Some(id) => self.store.delete(id).await,
            None => None,
        };

        match removed {
            Some(session) => {
                session.connection().close();
                tracing::info!(session = %session.id, "MCP session deleted");
                HttpResponse::Ok().json(json!({ "success": true }))
            }
            None => HttpResponse::NotFound().json(json!({ "error": "Session not found" })),
        }
    }

    fn exposed_headers(&self) -> &'static [&'static str] {
        EXPOSED_HEADERS
    }
}

/// Removes the session once its event stream is dropped
struct DisconnectGuard {
    store: Arc<dyn SessionStore>,
    session: Arc<McpSession>,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let store = self.store.clone();
        let session = self.session.clone();
        actix_web::rt::spawn(async move {
            if store.delete(&session.id).await.is_some() {
                tracing::info!(session = %session.id, "MCP event stream closed, session removed");
            }
            session.connection().close();
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::dispatcher::Dispatcher;
    use crate::mcp::protocol::ServerInfo;
    use crate::mcp::session::InMemorySessionStore;
    use actix_web::body::to_bytes;
    use actix_web::test::TestRequest;
    use serde_json::Value;

    fn transport(max_sessions: usize) -> StatefulTransport {
        let dispatcher = Dispatcher::with_design_catalogs(ServerInfo {
            name: "appleui-mcp".to_string(),
            version: "1.0.0".to_string(),
        })
        .unwrap();
        StatefulTransport::new(
            Arc::new(RequestProcessor::new(Arc::new(dispatcher))),
            Arc::new(InMemorySessionStore::new(
                Duration::from_secs(1800),
                max_sessions,
            )),
            Duration::from_secs(15),
        )
        .with_id_generator(Arc::new(|| "session-1".to_string()))
    }

    fn initialize() -> web::Bytes {
        web::Bytes::from_static(
            br#"{"jsonrpc":"2.0","method":"initialize","params":{"protocolVersion":"2024-11-05"},"id":1}"#,
        )
    }

    async fn json_body(response: HttpResponse) -> Value {
        let bytes = to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[actix_web::test]
    async fn initialize_creates_session() {
        let transport = transport(10);
        let req = TestRequest::post().to_http_request();
        let response = transport.handle_post(&req, initialize(), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get(SESSION_HEADER).unwrap(), "session-1");
        assert_eq!(transport.store().len().await, 1);

        let body = json_body(response).await;
        assert_eq!(body["result"]["protocolVersion"], "2024-11-05");
    }

    #[actix_web::test]
    async fn known_session_is_reused() {
        let transport = transport(10);
        let req = TestRequest::post().to_http_request();
        transport.handle_post(&req, initialize(), None).await;

        let req = TestRequest::post()
            .insert_header((SESSION_HEADER, "session-1"))
            .to_http_request();
        let body = web::Bytes::from_static(br#"{"jsonrpc":"2.0","method":"tools/list","id":2}"#);
        let response = transport.handle_post(&req, body, None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["result"]["tools"].as_array().unwrap().len(), 3);
        assert_eq!(transport.store().len().await, 1);
    }

    #[actix_web::test]
    async fn fresh_request_without_initialize_is_rejected() {
        let transport = transport(10);
        let req = TestRequest::post().to_http_request();
        let body = web::Bytes::from_static(br#"{"jsonrpc":"2.0","method":"ping","id":1}"#);
        let response = transport.handle_post(&req, body, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32000);
        assert_eq!(body["error"]["message"], "Bad Request: Server not initialized");
        assert_eq!(body["id"], Value::Null);
        assert_eq!(transport.store().len().await, 0);
    }

    #[actix_web::test]
    async fn unknown_session_header_needs_initialize() {
        let transport = transport(10);
        let req = TestRequest::post()
            .insert_header((SESSION_HEADER, "stale"))
            .to_http_request();
        let body = web::Bytes::from_static(br#"{"jsonrpc":"2.0","method":"ping","id":1}"#);
        let response = transport.handle_post(&req, body, None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn full_table_answers_service_unavailable() {
        let transport = transport(0);
        let req = TestRequest::post().to_http_request();
        let response = transport.handle_post(&req, initialize(), None).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], -32000);
        assert_eq!(body["error"]["message"], "Server at capacity");
    }

    #[actix_web::test]
    async fn delete_known_then_unknown() {
        let transport = transport(10);
        let req = TestRequest::post().to_http_request();
        transport.handle_post(&req, initialize(), None).await;

        let req = TestRequest::delete()
            .insert_header((SESSION_HEADER, "session-1"))
            .to_http_request();
        let response = transport.handle_delete(&req).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await, json!({ "success": true }));

        let response = transport.handle_delete(&req).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await, json!({ "error": "Session not found" }));
    }

    #[actix_web::test]
    async fn event_stream_ends_after_delete() {
        let transport = transport(10);
        let req = TestRequest::post().to_http_request();
        transport.handle_post(&req, initialize(), None).await;

        let req = TestRequest::get()
            .insert_header((SESSION_HEADER, "session-1"))
            .to_http_request();
        let stream = transport.handle_get(&req).await;
        assert_eq!(stream.status(), StatusCode::OK);

        let req = TestRequest::delete()
            .insert_header((SESSION_HEADER, "session-1"))
            .to_http_request();
        assert_eq!(transport.handle_delete(&req).await.status(), StatusCode::OK);

        let bytes = tokio::time::timeout(Duration::from_secs(2), to_bytes(stream.into_body()))
            .await
            .expect("event stream kept running after DELETE")
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[actix_web::test]
    async fn event_stream_emits_keep_alive_while_open() {
        use actix_web::body::MessageBody;

        let transport = transport(10);
        let req = TestRequest::post().to_http_request();
        transport.handle_post(&req, initialize(), None).await;

        let req = TestRequest::get()
            .insert_header((SESSION_HEADER, "session-1"))
            .to_http_request();
        let body = transport.handle_get(&req).await.into_body();
        let mut body = Box::pin(body);
        let chunk = futures::future::poll_fn(|cx| body.as_mut().poll_next(cx))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(&chunk[..], b": keep-alive\n\n");
    }

    #[actix_web::test]
    async fn event_stream_without_session_reports_error() {
        let req = TestRequest::get().to_http_request();
        let response = transport(10).handle_get(&req).await;
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/event-stream"
        );
        let bytes = to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&bytes[..], b"event: error\ndata: No session\n\n");
    }
}
