pub mod context;
pub mod dispatcher;
pub mod error;
pub mod processor;
pub mod prompts;
pub mod protocol;
#[cfg(test)]
mod protocol_tests;
pub mod registry;
pub mod resources;
pub mod session;
pub mod tokens;
pub mod tools;
pub mod transport;

pub use context::RequestContext;
pub use dispatcher::{Dispatcher, McpMethod};
pub use error::{ProtocolError, StartupError};
pub use processor::{Reply, RequestProcessor};
pub use prompts::PromptCatalog;
pub use protocol::*;
pub use registry::{ToolHandler, ToolRegistry};
pub use resources::ResourceCatalog;
pub use session::{InMemorySessionStore, McpSession, SessionStore};
pub use transport::{SessionTransport, StatefulTransport, StatelessTransport};
