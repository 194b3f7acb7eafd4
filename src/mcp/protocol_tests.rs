use crate::mcp::{
    CallToolRequest, CallToolResponse, IncomingMessage, InitializeParams, InitializeResult,
    JsonRpcError, JsonRpcResponse, RequestId, ServerCapabilities, ServerInfo, Tool, ToolContent,
    PROTOCOL_VERSION,
};
use serde_json::{json, Value};

#[test]
fn test_parse_call() {
    let message = IncomingMessage::parse(json!({
        "jsonrpc": "2.0",
        "id": 1,
        "method": "initialize",
        "params": {"test": "value"}
    }));

    assert_eq!(
        message,
        IncomingMessage::Call {
            id: RequestId::from(1),
            method: "initialize".to_string(),
            params: Some(json!({"test": "value"})),
        }
    );
    assert!(!message.is_notification());
}

#[test]
fn test_parse_null_id_is_a_call() {
    let message = IncomingMessage::parse(json!({"jsonrpc": "2.0", "id": null, "method": "ping"}));
    assert!(matches!(message, IncomingMessage::Call { id: RequestId::Null, .. }));
}

#[test]
fn test_parse_notification() {
    let message = IncomingMessage::parse(json!({"jsonrpc": "2.0", "method": "initialized", "params": null}));
    assert_eq!(
        message,
        IncomingMessage::Notify {
            method: "initialized".to_string(),
            params: None,
        }
    );
    assert!(message.is_notification());
    assert_eq!(message.method(), Some("initialized"));
}

#[test]
fn test_parse_invalid_elements() {
    assert!(matches!(
        IncomingMessage::parse(json!("ping")),
        IncomingMessage::Invalid { id: Some(RequestId::Null), .. }
    ));
    assert!(matches!(
        IncomingMessage::parse(json!({"id": "a", "method": 5})),
        IncomingMessage::Invalid { id: Some(RequestId::String(_)), .. }
    ));
    let orphan = IncomingMessage::parse(json!({"params": {}}));
    assert!(matches!(orphan, IncomingMessage::Invalid { id: None, .. }));
    assert!(orphan.is_notification());
}

#[test]
fn test_json_rpc_response_success() {
    let response = JsonRpcResponse::success(RequestId::from("abc"), json!({"result": "ok"}));

    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"jsonrpc": "2.0", "result": {"result": "ok"}, "id": "abc"})
    );
}

#[test]
fn test_json_rpc_response_error() {
    let response = JsonRpcResponse::error(
        RequestId::from(7),
        JsonRpcError::invalid_request("missing or non-string method"),
    );

    let body = serde_json::to_value(&response).unwrap();
    assert!(body.get("result").is_none());
    assert_eq!(body["error"]["code"], -32600);
    assert_eq!(body["error"]["message"], "Invalid Request");
    assert_eq!(body["id"], 7);
}

#[test]
fn test_uncorrelated_error_has_null_id() {
    let body = serde_json::to_value(JsonRpcError::missing_credential().into_response_body()).unwrap();
    assert!(body.as_object().unwrap().contains_key("id"));
    assert_eq!(body["id"], Value::Null);
    assert_eq!(body["error"]["code"], -32001);
}

#[test]
fn test_json_rpc_error_codes() {
    assert_eq!(JsonRpcError::invalid_request("x").code, -32600);
    assert_eq!(JsonRpcError::internal_error("x").code, -32603);
    assert_eq!(JsonRpcError::internal_error("").message, "Internal error");
    assert_eq!(JsonRpcError::invalid_credential("x").code, -32002);
    assert_eq!(JsonRpcError::server_error("x").code, -32000);
}

#[test]
fn test_tool_schema() {
    let tool = Tool {
        name: "review_design".to_string(),
        description: "Review a design".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {"code": {"type": "string"}},
            "required": ["code"]
        }),
    };

    let value = serde_json::to_value(&tool).unwrap();
    assert_eq!(value["name"], "review_design");
    assert_eq!(value["inputSchema"]["required"], json!(["code"]));
}

#[test]
fn test_call_tool_request_deserialize() {
    let req: CallToolRequest = serde_json::from_value(json!({
        "name": "get_style_guide",
        "arguments": {"topic": "colors"}
    }))
    .unwrap();

    assert_eq!(req.name, "get_style_guide");
    assert_eq!(req.arguments, Some(json!({"topic": "colors"})));
}

#[test]
fn test_call_tool_response() {
    let response = CallToolResponse::text("Hello".to_string());
    assert_eq!(
        serde_json::to_value(&response).unwrap(),
        json!({"content": [{"type": "text", "text": "Hello"}]})
    );
    assert_eq!(response.content[0], ToolContent::Text { text: "Hello".to_string() });
}

#[test]
fn test_call_tool_response_error() {
    let response = CallToolResponse::error("Error: boom".to_string());
    let value = serde_json::to_value(&response).unwrap();
    assert_eq!(value["isError"], true);
}

#[test]
fn test_initialize_params_deserialize() {
    let params: InitializeParams = serde_json::from_value(json!({
        "protocolVersion": "2024-11-05",
        "capabilities": {},
        "clientInfo": {"name": "inspector", "version": "1.0.0"}
    }))
    .unwrap();

    assert_eq!(params.protocol_version.as_deref(), Some("2024-11-05"));
    assert_eq!(params.client_info.unwrap().name, "inspector");

    let empty: InitializeParams = serde_json::from_value(json!({})).unwrap();
    assert!(empty.protocol_version.is_none());
}

#[test]
fn test_initialize_result_serialize() {
    let result = InitializeResult {
        protocol_version: PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities::fixed(),
        server_info: ServerInfo {
            name: "appleui-mcp".to_string(),
            version: "1.0.0".to_string(),
        },
    };

    let value = serde_json::to_value(&result).unwrap();
    assert_eq!(value["protocolVersion"], "2024-11-05");
    assert_eq!(value["capabilities"]["tools"]["listChanged"], false);
    assert_eq!(value["capabilities"]["resources"]["subscribe"], false);
    assert_eq!(value["serverInfo"]["name"], "appleui-mcp");
}
