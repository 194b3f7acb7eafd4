use super::protocol::{error_codes, JsonRpcError};

/// Failure raised while dispatching a single method call.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Resource not found: {0}")]
    ResourceNotFound(String),
    #[error("Prompt not found: {0}")]
    PromptNotFound(String),
    #[error("Invalid params: {0}")]
    InvalidParams(String),
    #[error("{0}")]
    Internal(String),
}

impl ProtocolError {
    pub fn code(&self) -> i32 {
        match self {
            ProtocolError::MethodNotFound(_) | ProtocolError::UnknownTool(_) => {
                error_codes::METHOD_NOT_FOUND
            }
            ProtocolError::ResourceNotFound(_)
            | ProtocolError::PromptNotFound(_)
            | ProtocolError::InvalidParams(_) => error_codes::INVALID_PARAMS,
            ProtocolError::Internal(_) => error_codes::INTERNAL_ERROR,
        }
    }
}

impl From<ProtocolError> for JsonRpcError {
    fn from(err: ProtocolError) -> Self {
        JsonRpcError::custom(err.code(), err.to_string(), None)
    }
}

/// Raised while assembling catalogs and the dispatch table at startup.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("no handler registered for method {0}")]
    MissingHandler(&'static str),
    #[error("method {0} has more than one handler")]
    DuplicateHandler(&'static str),
    #[error("tool {name} has an invalid input schema: {reason}")]
    InvalidToolSchema { name: String, reason: String },
    #[error("resource uri {0} must contain at most one closed {{param}} segment")]
    InvalidResourceUri(String),
    #[error("duplicate {kind} registered: {name}")]
    Duplicate { kind: &'static str, name: String },
}
