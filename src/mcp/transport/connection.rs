use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

use crate::mcp::context::RequestContext;
use crate::mcp::processor::{Processed, RequestProcessor};

/// One protocol server bound to one transport.
///
/// Stateless mode builds one per POST; stateful mode keeps one per session.
pub struct McpConnection {
    id: uuid::Uuid,
    session_id: OnceLock<String>,
    processor: Arc<RequestProcessor>,
    closed: AtomicBool,
}

impl McpConnection {
    pub fn connect(processor: Arc<RequestProcessor>) -> Arc<Self> {
        let connection = Arc::new(Self {
            id: uuid::Uuid::new_v4(),
            session_id: OnceLock::new(),
            processor,
            closed: AtomicBool::new(false),
        });
        tracing::debug!(connection = %connection.id, "MCP connection opened");
        connection
    }

    /// Bind the session id; the first assignment wins
    pub fn assign_session(&self, session_id: String) -> bool {
        self.session_id.set(session_id).is_ok()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.get().map(String::as_str)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    pub async fn handle(&self, body: Value, context: &RequestContext) -> Processed {
        self.processor.process_tracked(body, context).await
    }

    /// Idempotent
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        tracing::debug!(
            connection = %self.id,
            session = self.session_id().unwrap_or("-"),
            "MCP connection closed"
        );
    }
}

impl fmt::Debug for McpConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("McpConnection")
            .field("id", &self.id)
            .field("session_id", &self.session_id.get())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Closes the connection when dropped, including on request cancellation
pub struct CloseOnDrop(pub Arc<McpConnection>);

impl Drop for CloseOnDrop {
    fn drop(&mut self) {
        self.0.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::dispatcher::Dispatcher;
    use crate::mcp::protocol::ServerInfo;

    fn processor() -> Arc<RequestProcessor> {
        let dispatcher = Dispatcher::with_design_catalogs(ServerInfo {
            name: "appleui-mcp".to_string(),
            version: "1.0.0".to_string(),
        })
        .unwrap();
        Arc::new(RequestProcessor::new(Arc::new(dispatcher)))
    }

    #[test]
    fn session_id_is_assigned_once() {
        let connection = McpConnection::connect(processor());
        assert!(connection.session_id().is_none());
        assert!(connection.assign_session("first".to_string()));
        assert!(!connection.assign_session("second".to_string()));
        assert_eq!(connection.session_id(), Some("first"));
    }

    #[test]
    fn guard_closes_on_drop() {
        let connection = McpConnection::connect(processor());
        {
            let _guard = CloseOnDrop(connection.clone());
            assert!(!connection.is_closed());
        }
        assert!(connection.is_closed());
        // second close is a no-op
        connection.close();
        assert!(connection.is_closed());
    }
}
