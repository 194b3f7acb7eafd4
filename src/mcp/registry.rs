use async_trait::async_trait;
use indexmap::IndexMap;
use jsonschema::Validator;
use serde_json::Value;

use super::context::RequestContext;
use super::error::StartupError;
use super::protocol::{CallToolResponse, Tool, ToolContent};
use super::tools::{ComponentGeneratorTool, DesignReviewTool, StyleGuideTool};

/// Trait for tool handlers
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Execute the tool with arguments that already passed schema validation
    async fn execute(&self, args: Value, context: &RequestContext)
        -> Result<ToolContent, String>;

    /// Return the tool schema definition
    fn schema(&self) -> Tool;
}

struct RegisteredTool {
    descriptor: Tool,
    validator: Validator,
    handler: Box<dyn ToolHandler>,
}

/// Tool registry managing all available MCP tools, in registration order
pub struct ToolRegistry {
    tools: IndexMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn empty() -> Self {
        Self {
            tools: IndexMap::new(),
        }
    }

    /// Registry with the three design tools
    pub fn with_design_tools() -> Result<Self, StartupError> {
        let mut registry = Self::empty();
        registry.register(Box::new(DesignReviewTool))?;
        registry.register(Box::new(ComponentGeneratorTool))?;
        registry.register(Box::new(StyleGuideTool))?;
        Ok(registry)
    }

    /// Register a tool handler, compiling its input schema once
    pub fn register(&mut self, handler: Box<dyn ToolHandler>) -> Result<(), StartupError> {
        let descriptor = handler.schema();
        if self.tools.contains_key(&descriptor.name) {
            return Err(StartupError::Duplicate {
                kind: "tool",
                name: descriptor.name,
            });
        }

        let validator = jsonschema::validator_for(&descriptor.input_schema).map_err(|e| {
            StartupError::InvalidToolSchema {
                name: descriptor.name.clone(),
                reason: e.to_string(),
            }
        })?;

        self.tools.insert(
            descriptor.name.clone(),
            RegisteredTool {
                descriptor,
                validator,
                handler,
            },
        );
        Ok(())
    }

    /// List all available tools
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.values().map(|t| t.descriptor.clone()).collect()
    }

    /// Get count of registered tools
    pub fn count(&self) -> usize {
        self.tools.len()
    }

    /// Validate and run a tool.
    ///
    /// Returns `None` for an unknown name. Schema and execution failures come
    /// back as an `isError` result, never as `None`.
    pub async fn invoke(
        &self,
        name: &str,
        args: Value,
        context: &RequestContext,
    ) -> Option<CallToolResponse> {
        let tool = self.tools.get(name)?;

        if let Err(reason) = validate_args(&tool.validator, &args) {
            tracing::warn!(tool = name, "Rejected tool arguments: {}", reason);
            return Some(CallToolResponse::error(format!(
                "Error: Invalid arguments: {}",
                reason
            )));
        }

        let response = match tool.handler.execute(args, context).await {
            Ok(ToolContent::Text { text }) => {
                tracing::info!("Tool executed successfully");
                CallToolResponse::text(text)
            }
            Err(e) => {
                tracing::error!("Tool execution failed: {}", e);
                CallToolResponse::error(format!("Error: {}", e))
            }
        };
        Some(response)
    }
}

fn validate_args(validator: &Validator, args: &Value) -> Result<(), String> {
    if validator.is_valid(args) {
        return Ok(());
    }

    let msg = validator
        .iter_errors(args)
        .take(5)
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");

    if msg.is_empty() {
        Err("arguments do not match the input schema".to_string())
    } else {
        Err(msg)
    }
}
