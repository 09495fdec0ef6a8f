//! Tool definitions and the dispatching registry.
//!
//! [`ToolRegistry::call`] is the single entry point the protocol layer uses:
//! it routes a tool name to its handler and turns every outcome, success or
//! failure, into a [`ToolCallResult`].

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::executor::RequestExecutor;
use crate::protocol::{ToolCallResult, ToolDefinition};
use crate::transport::HttpTransport;

mod request;
mod upload;

pub use request::RequestTool;
pub use upload::UploadTool;

/// Tool trait for implementing MCP tools.
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool definition.
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with the given arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
        context: &ToolContext,
    ) -> Result<ToolCallResult>;
}

/// Context passed to tools during execution.
///
/// Immutable and shared across concurrent calls.
pub struct ToolContext {
    /// Sends requests through the configured transport.
    pub executor: RequestExecutor,
}

impl ToolContext {
    /// Create a new tool context.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            executor: RequestExecutor::new(transport),
        }
    }
}

/// Registry of available tools.
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
    context: Arc<ToolContext>,
}

impl ToolRegistry {
    /// Create a registry with `primp_request` and `primp_upload`.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        let mut registry = Self {
            tools: BTreeMap::new(),
            context: Arc::new(ToolContext::new(transport)),
        };
        registry.register(Arc::new(RequestTool));
        registry.register(Arc::new(UploadTool));
        registry
    }

    /// Get tool definitions, sorted by name.
    pub fn list_tools(&self) -> Vec<ToolDefinition> {
        self.tools.values().map(|t| t.definition()).collect()
    }

    /// Execute a tool by name, propagating failures.
    pub async fn execute(&self, name: &str, arguments: serde_json::Value) -> Result<ToolCallResult> {
        let tool = self
            .tools
            .get(name)
            .ok_or_else(|| Error::UnknownTool(name.to_string()))?;

        tool.execute(arguments, &self.context).await
    }

    /// Execute a tool by name and contain any failure in an error result.
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> ToolCallResult {
        let span = tracing::info_span!("tool_call", tool = %name, call_id = %Uuid::new_v4());
        async {
            match self.execute(name, arguments).await {
                Ok(result) => result,
                Err(e) => {
                    tracing::warn!(kind = e.kind(), "tool call failed: {}", e);
                    ToolCallResult::error(&e)
                }
            }
        }
        .instrument(span)
        .await
    }

    /// Register a custom tool, replacing any tool with the same name.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        let name = tool.definition().name;
        self.tools.insert(name, tool);
    }
}
