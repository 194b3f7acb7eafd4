use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol version this server always answers with
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Client protocol versions accepted without a warning
pub const SUPPORTED_PROTOCOL_VERSIONS: &[&str] = &["2024-11-05", "2024-10-07"];

/// JSON-RPC error codes used on the wire
pub mod error_codes {
    pub const SERVER_ERROR: i32 = -32000;
    pub const MISSING_CREDENTIAL: i32 = -32001;
    pub const INVALID_CREDENTIAL: i32 = -32002;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

pub type Params = Map<String, Value>;

/// JSON-RPC 2.0 request id.
///
/// `Null` is an id that was sent as `null` (or could not be understood); an
/// absent id is never represented here, see [`IncomingMessage`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(serde_json::Number),
    String(String),
    Null,
}

impl RequestId {
    /// Returns `None` when the value is not a legal id type.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => Some(RequestId::Number(n.clone())),
            Value::String(s) => Some(RequestId::String(s.clone())),
            Value::Null => Some(RequestId::Null),
            _ => None,
        }
    }
}

impl From<i64> for RequestId {
    fn from(value: i64) -> Self {
        RequestId::Number(value.into())
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::String(value.to_string())
    }
}

/// One element of a request body after the parse boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum IncomingMessage {
    /// Carries an id and expects exactly one response
    Call {
        id: RequestId,
        method: String,
        params: Option<Value>,
    },
    /// No id: fire-and-forget
    Notify { method: String, params: Option<Value> },
    /// Not a usable request. `id` is `None` when the element had no id field.
    Invalid {
        id: Option<RequestId>,
        reason: String,
    },
}

impl IncomingMessage {
    pub fn parse(value: Value) -> Self {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return IncomingMessage::Invalid {
                    id: Some(RequestId::Null),
                    reason: format!("expected a JSON object, got {}", json_type_name(&other)),
                }
            }
        };

        // presence of the field is what matters, not its value
        let id = object
            .get("id")
            .map(|raw| RequestId::from_value(raw).unwrap_or(RequestId::Null));

        let method = match object.remove("method") {
            Some(Value::String(method)) => method,
            _ => {
                return IncomingMessage::Invalid {
                    id,
                    reason: "missing or non-string method".to_string(),
                }
            }
        };

        let params = match object.remove("params") {
            None | Some(Value::Null) => None,
            Some(params) => Some(params),
        };

        match id {
            Some(id) => IncomingMessage::Call { id, method, params },
            None => IncomingMessage::Notify { method, params },
        }
    }

    pub fn method(&self) -> Option<&str> {
        match self {
            IncomingMessage::Call { method, .. } | IncomingMessage::Notify { method, .. } => {
                Some(method)
            }
            IncomingMessage::Invalid { .. } => None,
        }
    }

    pub fn is_notification(&self) -> bool {
        matches!(
            self,
            IncomingMessage::Notify { .. } | IncomingMessage::Invalid { id: None, .. }
        )
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// JSON-RPC 2.0 Response structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String, // Must be "2.0"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: RequestId,
}

impl JsonRpcResponse {
    pub fn success(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: RequestId, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(error),
            id,
        }
    }
}

/// JSON-RPC 2.0 Error structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcError {
    pub fn invalid_request(reason: &str) -> Self {
        Self {
            code: error_codes::INVALID_REQUEST,
            message: "Invalid Request".to_string(),
            data: Some(serde_json::json!({ "error": reason })),
        }
    }

    pub fn internal_error(msg: &str) -> Self {
        let message = if msg.trim().is_empty() {
            "Internal error".to_string()
        } else {
            msg.to_string()
        };
        Self::custom(error_codes::INTERNAL_ERROR, message, None)
    }

    pub fn missing_credential() -> Self {
        Self::custom(
            error_codes::MISSING_CREDENTIAL,
            "API key required. Include Authorization: Bearer YOUR_API_KEY header.".to_string(),
            None,
        )
    }

    pub fn invalid_credential(msg: &str) -> Self {
        Self::custom(error_codes::INVALID_CREDENTIAL, msg.to_string(), None)
    }

    pub fn server_error(msg: &str) -> Self {
        Self::custom(error_codes::SERVER_ERROR, msg.to_string(), None)
    }

    pub fn custom(code: i32, message: String, data: Option<Value>) -> Self {
        Self {
            code,
            message,
            data,
        }
    }

    /// Standalone error body, used where no request could be correlated
    pub fn into_response_body(self) -> JsonRpcResponse {
        JsonRpcResponse::error(RequestId::Null, self)
    }
}

// MCP-specific types

/// MCP Tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value, // JSON Schema for parameters
}

/// Response for tools/list method
#[derive(Debug, Clone, Serialize)]
pub struct ToolListResponse {
    pub tools: Vec<Tool>,
}

/// Request for tools/call method
#[derive(Debug, Clone, Deserialize)]
pub struct CallToolRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Value>,
}

/// Response for tools/call method
#[derive(Debug, Clone, Serialize)]
pub struct CallToolResponse {
    pub content: Vec<ToolContent>,
    #[serde(rename = "isError", skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
}

impl CallToolResponse {
    pub fn text(text: String) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
            is_error: None,
        }
    }

    pub fn error(text: String) -> Self {
        Self {
            content: vec![ToolContent::Text { text }],
            is_error: Some(true),
        }
    }
}

/// Text payload shared by tool results and prompt messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ToolContent {
    #[serde(rename = "text")]
    Text { text: String },
}

/// MCP Initialize request parameters.
///
/// Every field is optional: a client sending an odd handshake still gets an
/// answer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InitializeParams {
    #[serde(rename = "protocolVersion", default)]
    pub protocol_version: Option<String>,
    #[serde(default)]
    pub capabilities: Option<Value>,
    #[serde(rename = "clientInfo", default)]
    pub client_info: Option<ClientInfo>,
}

/// Client information
#[derive(Debug, Clone, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
}

/// MCP Initialize response
#[derive(Debug, Clone, Serialize)]
pub struct InitializeResult {
    #[serde(rename = "protocolVersion")]
    pub protocol_version: String,
    pub capabilities: ServerCapabilities,
    #[serde(rename = "serverInfo")]
    pub server_info: ServerInfo,
}

/// Server capabilities
#[derive(Debug, Clone, Serialize)]
pub struct ServerCapabilities {
    pub tools: ListChangedCapability,
    pub resources: ResourcesCapability,
    pub prompts: ListChangedCapability,
}

impl ServerCapabilities {
    /// The fixed capability set: nothing is subscribable and no list ever changes
    pub fn fixed() -> Self {
        Self {
            tools: ListChangedCapability {
                list_changed: false,
            },
            resources: ResourcesCapability {
                subscribe: false,
                list_changed: false,
            },
            prompts: ListChangedCapability {
                list_changed: false,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListChangedCapability {
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourcesCapability {
    pub subscribe: bool,
    #[serde(rename = "listChanged")]
    pub list_changed: bool,
}

/// Server information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerInfo {
    pub name: String,
    pub version: String,
}

/// Entry of a resources/list response
#[derive(Debug, Clone, Serialize)]
pub struct Resource {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResourceListResponse {
    pub resources: Vec<Resource>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReadResourceRequest {
    pub uri: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceContents {
    pub uri: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResponse {
    pub contents: Vec<ResourceContents>,
}

/// Entry of a prompts/list response
#[derive(Debug, Clone, Serialize)]
pub struct Prompt {
    pub name: String,
    pub description: String,
    pub arguments: Vec<PromptArgument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptListResponse {
    pub prompts: Vec<Prompt>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetPromptRequest {
    pub name: String,
    #[serde(default)]
    pub arguments: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: ToolContent,
}

#[derive(Debug, Clone, Serialize)]
pub struct GetPromptResponse {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}
