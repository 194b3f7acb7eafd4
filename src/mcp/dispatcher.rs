use futures::future::BoxFuture;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use tracing::Instrument;

use super::context::RequestContext;
use super::error::{ProtocolError, StartupError};
use super::prompts::PromptCatalog;
use super::protocol::{
    CallToolRequest, GetPromptRequest, InitializeParams, InitializeResult, Params,
    PromptListResponse, ReadResourceRequest, ReadResourceResponse, ResourceListResponse, ServerCapabilities, ServerInfo, ToolListResponse, PROTOCOL_VERSION,
    SUPPORTED_PROTOCOL_VERSIONS,
};
use super::registry::ToolRegistry;
use super::resources::ResourceCatalog;

/// Every method the server answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum McpMethod {
    Initialize,
    Initialized,
    Ping,
    ToolsList,
    ToolsCall,
    ResourcesList,
    ResourcesRead,
    PromptsList,
    PromptsGet,
}

impl McpMethod {
    pub const ALL: [McpMethod; 9] = [
        McpMethod::Initialize,
        McpMethod::Initialized,
        McpMethod::Ping,
        McpMethod::ToolsList,
        McpMethod::ToolsCall,
        McpMethod::ResourcesList,
        McpMethod::ResourcesRead,
        McpMethod::PromptsList,
        McpMethod::PromptsGet,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            McpMethod::Initialize => "initialize",
            McpMethod::Initialized => "initialized",
            McpMethod::Ping => "ping",
            McpMethod::ToolsList => "tools/list",
            McpMethod::ToolsCall => "tools/call",
            McpMethod::ResourcesList => "resources/list",
            McpMethod::ResourcesRead => "resources/read",
            McpMethod::PromptsList => "prompts/list",
            McpMethod::PromptsGet => "prompts/get",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        if name == "notifications/initialized" {
            return Some(McpMethod::Initialized);
        }
        Self::ALL.into_iter().find(|m| m.as_str() == name)
    }
}

pub type MethodHandler = for<'a> fn(
    &'a Dispatcher,
    Params,
    &'a RequestContext,
) -> BoxFuture<'a, Result<Value, ProtocolError>>;

const METHOD_TABLE: &[(McpMethod, MethodHandler)] = &[
    (McpMethod::Initialize, handle_initialize),
    (McpMethod::Initialized, handle_empty),
    (McpMethod::Ping, handle_empty),
    (McpMethod::ToolsList, handle_tools_list),
    (McpMethod::ToolsCall, handle_tools_call),
    (McpMethod::ResourcesList, handle_resources_list),
    (McpMethod::ResourcesRead, handle_resources_read),
    (McpMethod::PromptsList, handle_prompts_list),
    (McpMethod::PromptsGet, handle_prompts_get),
];

fn build_table(
    table: &[(McpMethod, MethodHandler)],
) -> Result<HashMap<McpMethod, MethodHandler>, StartupError> {
    let mut handlers = HashMap::with_capacity(table.len());
    for (method, handler) in table {
        if handlers.insert(*method, *handler).is_some() {
            return Err(StartupError::DuplicateHandler(method.as_str()));
        }
    }
    if let Some(missing) = McpMethod::ALL.iter().find(|m| !handlers.contains_key(*m)) {
        return Err(StartupError::MissingHandler(missing.as_str()));
    }
    Ok(handlers)
}

/// Routes method names to the tool registry and the catalogs
pub struct Dispatcher {
    tools: ToolRegistry,
    resources: ResourceCatalog,
    prompts: PromptCatalog,
    server_info: ServerInfo,
    handlers: HashMap<McpMethod, MethodHandler>,
}

impl Dispatcher {
    pub fn new(
        tools: ToolRegistry,
        resources: ResourceCatalog,
        prompts: PromptCatalog,
        server_info: ServerInfo,
    ) -> Result<Self, StartupError> {
        let handlers = build_table(METHOD_TABLE)?;
        tracing::info!(
            tools = tools.count(),
            resources = resources.count(),
            prompts = prompts.count(),
            "Method dispatcher ready"
        );
        Ok(Self {
            tools,
            resources,
            prompts,
            server_info,
            handlers,
        })
    }

    /// Dispatcher wired to the design tools and catalogs
    pub fn with_design_catalogs(server_info: ServerInfo) -> Result<Self, StartupError> {
        Self::new(
            ToolRegistry::with_design_tools()?,
            ResourceCatalog::design_tokens()?,
            PromptCatalog::design_prompts()?,
            server_info,
        )
    }

    pub async fn dispatch(
        &self,
        method: &str,
        params: Option<Value>,
        context: &RequestContext,
    ) -> Result<Value, ProtocolError> {
        let Some(known) = McpMethod::from_name(method) else {
            return Err(ProtocolError::MethodNotFound(method.to_string()));
        };

        let params = match params {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(map)) => map,
            Some(_) => {
                return Err(ProtocolError::InvalidParams(
                    "params must be an object".to_string(),
                ))
            }
        };

        let handler = self
            .handlers
            .get(&known)
            .ok_or_else(|| ProtocolError::Internal(format!("no handler for {}", method)))?;
        handler(self, params, context).await
    }

    async fn initialize(&self, params: Params) -> Result<Value, ProtocolError> {
        let init: InitializeParams = serde_json::from_value(Value::Object(params))
            .unwrap_or_else(|e| {
                tracing::warn!("Lenient initialize: ignoring malformed params: {}", e);
                InitializeParams::default()
            });

        match init.protocol_version.as_deref() {
            Some(version) if SUPPORTED_PROTOCOL_VERSIONS.contains(&version) => {}
            other => tracing::warn!(
                requested = ?other,
                answered = PROTOCOL_VERSION,
                "Client requested an unsupported protocol version"
            ),
        }

        tracing::info!(
            client = init.client_info.as_ref().map(|c| c.name.as_str()).unwrap_or("unknown"),
            client_version = init
                .client_info
                .as_ref()
                .and_then(|c| c.version.as_deref())
                .unwrap_or("unknown"),
            "MCP client initialized"
        );

        to_result(InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities::fixed(),
            server_info: self.server_info.clone(),
        })
    }

    async fn tools_call(&self, params: Params, context: &RequestContext) -> Result<Value, ProtocolError> {
        let CallToolRequest { name, arguments } = parse_params(params)?;
        let arguments = arguments.unwrap_or_else(|| json!({}));

        let tool_span = tracing::info_span!(
            "mcp_tool_call",
            tool = %name,
            user = %context.user_label(),
        );

        let response = self
            .tools
            .invoke(&name, arguments, context)
            .instrument(tool_span)
            .await;

        match response {
            Some(response) => to_result(response),
            None => {
                tracing::warn!("Tool not found: {}", name);
                Err(ProtocolError::UnknownTool(name))
            }
        }
    }

    async fn resources_read(&self, params: Params) -> Result<Value, ProtocolError> {
        let ReadResourceRequest { uri } = parse_params(params)?;
        match self.resources.read(&uri) {
            Some(contents) => to_result(ReadResourceResponse {
                contents: vec![contents],
            }),
            None => Err(ProtocolError::ResourceNotFound(uri)),
        }
    }

    async fn prompts_get(&self, params: Params) -> Result<Value, ProtocolError> {
        let GetPromptRequest { name, arguments } = parse_params(params)?;
        match self.prompts.get(&name, arguments.as_ref()) {
            Some(prompt) => to_result(prompt),
            None => Err(ProtocolError::PromptNotFound(name)),
        }
    }
}

/// Typed view of a method's params; shape errors become -32602
fn parse_params<T: DeserializeOwned>(params: Params) -> Result<T, ProtocolError> {
    serde_json::from_value(Value::Object(params))
        .map_err(|e| ProtocolError::InvalidParams(e.to_string()))
}

fn to_result<T: Serialize>(value: T) -> Result<Value, ProtocolError> {
    serde_json::to_value(value)
        .map_err(|e| ProtocolError::Internal(format!("Failed to serialize result: {}", e)))
}

fn handle_initialize<'a>(
    d: &'a Dispatcher,
    params: Params,
    _context: &'a RequestContext,
) -> BoxFuture<'a, Result<Value, ProtocolError>> {
    Box::pin(d.initialize(params))
}

fn handle_empty<'a>(
    _d: &'a Dispatcher,
    _params: Params,
    _context: &'a RequestContext,
) -> BoxFuture<'a, Result<Value, ProtocolError>> {
    Box::pin(async { Ok::<_, ProtocolError>(json!({})) })
}

fn handle_tools_list<'a>(
    d: &'a Dispatcher,
    _params: Params,
    _context: &'a RequestContext,
) -> BoxFuture<'a, Result<Value, ProtocolError>> {
    Box::pin(async move {
        let tools = d.tools.list_tools();
        tracing::debug!("Listing {} available tools", tools.len());
        to_result(ToolListResponse { tools })
    })
}

fn handle_tools_call<'a>(
    d: &'a Dispatcher,
    params: Params,
    context: &'a RequestContext,
) -> BoxFuture<'a, Result<Value, ProtocolError>> {
    Box::pin(d.tools_call(params, context))
}

fn handle_resources_list<'a>(
    d: &'a Dispatcher,
    _params: Params,
    _context: &'a RequestContext,
) -> BoxFuture<'a, Result<Value, ProtocolError>> {
    Box::pin(async move {
        to_result(ResourceListResponse {
            resources: d.resources.list(),
        })
    })
}

fn handle_resources_read<'a>(
    d: &'a Dispatcher,
    params: Params,
    _context: &'a RequestContext,
) -> BoxFuture<'a, Result<Value, ProtocolError>> {
    Box::pin(d.resources_read(params))
}

fn handle_prompts_list<'a>(
    d: &'a Dispatcher,
    _params: Params,
    _context: &'a RequestContext,
) -> BoxFuture<'a, Result<Value, ProtocolError>> {
    Box::pin(async move {
        to_result(PromptListResponse {
            prompts: d.prompts.list(),
        })
    })
}

fn handle_prompts_get<'a>(
    d: &'a Dispatcher,
    params: Params,
    _context: &'a RequestContext,
) -> BoxFuture<'a, Result<Value, ProtocolError>> {
    Box::pin(d.prompts_get(params))
}
