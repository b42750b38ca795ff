//! Tool Router - builds the rmcp ToolRouter from the tool registrations.
//!
//! Every route forwards the raw argument object to [`ToolRegistry::dispatch`],
//! so argument validation happens in one place and malformed arguments come
//! back as `{success: false, error}` structured content rather than as
//! JSON-RPC errors.

use crate::models::{ToolInvocation, ToolResponse};
use crate::tools::query::QueryInput;
use crate::tools::read::{GetAllItemsInput, GetItemInput};
use crate::tools::registry::{TOOLS, ToolKind, ToolRegistration, ToolRegistry};
use crate::tools::schema::NoArguments;
use crate::tools::write::{CreateItemInput, DeleteItemInput, UpdateItemInput};
use futures_util::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, ToolRouter, schema_for_type},
    model::{CallToolResult, JsonObject, Tool},
};
use std::sync::Arc;

/// Build the tool router with every registered tool.
pub fn build_tool_router<S>(registry: ToolRegistry) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    TOOLS.iter().fold(ToolRouter::new(), |router, registration| {
        router.with_route(create_route(registration, registry.clone()))
    })
}

/// Tool metadata advertised in `tools/list`.
pub fn to_tool(registration: &ToolRegistration) -> Tool {
    let mut tool = Tool::new(
        registration.name,
        registration.description,
        input_schema(registration.kind),
    );
    tool.output_schema = Some(schema_for_type::<ToolResponse>());
    tool
}

fn input_schema(kind: ToolKind) -> Arc<JsonObject> {
    match kind {
        ToolKind::Query => schema_for_type::<QueryInput>(),
        ToolKind::GetItem => schema_for_type::<GetItemInput>(),
        ToolKind::GetAllItems => schema_for_type::<GetAllItemsInput>(),
        ToolKind::CreateItem => schema_for_type::<CreateItemInput>(),
        ToolKind::UpdateItem => schema_for_type::<UpdateItemInput>(),
        ToolKind::DeleteItem => schema_for_type::<DeleteItemInput>(),
        ToolKind::GetAllTables | ToolKind::DbVersion => schema_for_type::<NoArguments>(),
    }
}

fn create_route<S>(registration: &'static ToolRegistration, registry: ToolRegistry) -> ToolRoute<S>
where
    S: Send + Sync + 'static,
{
    ToolRoute::new_dyn(to_tool(registration), move |ctx: ToolCallContext<'_, S>| {
        let arguments = ctx.arguments.clone().unwrap_or_default();
        let registry = registry.clone();
        async move { call_tool(&registry, registration.name, arguments).await }.boxed()
    })
}

/// Dispatch one call and wrap the response as structured content.
///
/// Only a response that cannot be serialized becomes a protocol error.
pub async fn call_tool(
    registry: &ToolRegistry,
    name: &str,
    arguments: JsonObject,
) -> Result<CallToolResult, McpError> {
    let invocation = ToolInvocation {
        name: name.to_string(),
        arguments,
    };
    let response = registry.dispatch(invocation).await;
    let value = serde_json::to_value(&response)
        .map_err(|e| McpError::internal_error(format!("Failed to serialize response: {}", e), None))?;
    Ok(CallToolResult::structured(value))
}
