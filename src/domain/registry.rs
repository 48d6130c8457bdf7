//! In-memory tool registry backing `tools/list` and `tools/call`

use std::{
    sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
    time::Instant,
};

use serde::Serialize;
use tracing::{error, info, warn};

use crate::domain::tool::{Tool, ToolArguments, ToolDefinition, ToolResult};
use crate::errors::RegistryError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub total_tools: usize,
    pub tool_names: Vec<String>,
}

/// Name-unique tool collection that enumerates in insertion order.
///
/// Reads may run concurrently; mutation takes the write lock.
#[derive(Default)]
pub struct ToolRegistry {
    tools: RwLock<Vec<Arc<dyn Tool>>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<dyn Tool>>> {
        self.tools.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Arc<dyn Tool>>> {
        self.tools.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register(&self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let mut tools = self.write();
        if tools.iter().any(|existing| existing.name() == tool.name()) {
            return Err(RegistryError::DuplicateTool(tool.name().to_string()));
        }

        info!(tool = tool.name(), "tool registered");
        tools.push(tool);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.read().iter().find(|tool| tool.name() == name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().iter().any(|tool| tool.name() == name)
    }

    pub fn list(&self) -> Vec<Arc<dyn Tool>> {
        self.read().clone()
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.read().iter().map(|tool| tool.definition()).collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Runs a tool by name. Unknown names and panicking tools yield
    /// error-flagged results instead of failures.
    pub async fn execute(&self, name: &str, args: ToolArguments) -> ToolResult {
        let Some(tool) = self.get(name) else {
            warn!(tool = name, "tool not found");
            return ToolResult::error(format!("tool '{name}' not found"));
        };

        let started_at = Instant::now();
        let outcome = tokio::spawn(async move { tool.execute(args).await }).await;
        let elapsed_ms = started_at.elapsed().as_millis();

        match outcome {
            Ok(result) => {
                info!(
                    tool = name,
                    duration_ms = elapsed_ms,
                    is_error = result.is_error,
                    "tool executed"
                );
                result
            }
            Err(err) => {
                error!(tool = name, error = %err, "tool execution aborted");
                ToolResult::error(format!("error executing tool '{name}': {err}"))
            }
        }
    }

    pub fn unregister(&self, name: &str) -> bool {
        let mut tools = self.write();
        let before = tools.len();
        tools.retain(|tool| tool.name() != name);
        let removed = tools.len() < before;
        if removed {
            info!(tool = name, "tool removed");
        }
        removed
    }

    pub fn clear(&self) {
        self.write().clear();
        info!("all tools removed");
    }

    pub fn stats(&self) -> RegistryStats {
        let tools = self.read();
        RegistryStats {
            total_tools: tools.len(),
            tool_names: tools.iter().map(|tool| tool.name().to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::domain::random_number::RandomNumberTool;
    use crate::domain::tool::ToolSchema;

    struct NamedTool {
        name: &'static str,
        schema: ToolSchema,
    }

    impl NamedTool {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                schema: ToolSchema::empty_object(),
            }
        }
    }

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "test tool"
        }

        fn input_schema(&self) -> &ToolSchema {
            &self.schema
        }

        async fn execute(&self, _args: ToolArguments) -> ToolResult {
            ToolResult::text(self.name)
        }
    }

    struct PanickingTool {
        schema: ToolSchema,
    }

    #[async_trait]
    impl Tool for PanickingTool {
        fn name(&self) -> &str {
            "explode"
        }

        fn description(&self) -> &str {
            "always panics"
        }

        fn input_schema(&self) -> &ToolSchema {
            &self.schema
        }

        async fn execute(&self, _args: ToolArguments) -> ToolResult {
            panic!("kaboom");
        }
    }

    #[test]
    fn register_and_get() {
        let registry = ToolRegistry::new();
        registry
            .register(Arc::new(RandomNumberTool::new()))
            .expect("first registration");

        assert!(registry.contains("generateRandomNumber"));
        let tool = registry.get("generateRandomNumber").expect("registered tool");
        assert_eq!(tool.name(), "generateRandomNumber");
        assert!(registry.get("nonExistentTool").is_none());
    }

    #[test]
    fn duplicate_registration_fails_and_keeps_one_entry() {
        let registry = ToolRegistry::new();
        registry
            .register(Arc::new(RandomNumberTool::new()))
            .expect("first registration");

        let err = registry
            .register(Arc::new(RandomNumberTool::new()))
            .expect_err("duplicate must fail");

        assert_eq!(
            err,
            RegistryError::DuplicateTool("generateRandomNumber".to_string())
        );
        assert_eq!(err.to_string(), "tool 'generateRandomNumber' is already registered");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn list_and_definitions_keep_insertion_order() {
        let registry = ToolRegistry::new();
        assert!(registry.list().is_empty());

        for name in ["zeta", "alpha", "mid"] {
            registry
                .register(Arc::new(NamedTool::new(name)))
                .expect("registration");
        }

        let names = registry
            .list()
            .iter()
            .map(|tool| tool.name().to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);

        let definition_names = registry
            .definitions()
            .into_iter()
            .map(|definition| definition.name)
            .collect::<Vec<_>>();
        assert_eq!(definition_names, names);
    }

    #[tokio::test]
    async fn execute_unknown_tool_returns_error_result() {
        let registry = ToolRegistry::new();
        let result = registry
            .execute("nonExistentTool", ToolArguments::new())
            .await;

        assert!(result.is_error);
        assert_eq!(result.first_text(), Some("tool 'nonExistentTool' not found"));
    }

    #[tokio::test]
    async fn execute_delegates_to_tool() {
        let registry = ToolRegistry::new();
        registry
            .register(Arc::new(RandomNumberTool::new()))
            .expect("registration");

        let result = registry
            .execute("generateRandomNumber", ToolArguments::new())
            .await;

        assert!(!result.is_error);
        assert_eq!(result.content.len(), 1);
    }

    #[tokio::test]
    async fn execute_isolates_panicking_tool() {
        let registry = ToolRegistry::new();
        registry
            .register(Arc::new(PanickingTool {
                schema: ToolSchema::empty_object(),
            }))
            .expect("registration");

        let result = registry.execute("explode", ToolArguments::new()).await;

        assert!(result.is_error);
        assert!(result
            .first_text()
            .expect("error text")
            .starts_with("error executing tool 'explode'"));
        assert!(registry.contains("explode"));
    }

    #[test]
    fn unregister_reports_removal() {
        let registry = ToolRegistry::new();
        registry
            .register(Arc::new(NamedTool::new("a")))
            .expect("registration");

        assert!(registry.unregister("a"));
        assert!(!registry.unregister("a"));
        assert!(registry.is_empty());
    }

    #[test]
    fn clear_is_idempotent_and_stats_track_contents() {
        let registry = ToolRegistry::new();
        assert_eq!(
            registry.stats(),
            RegistryStats {
                total_tools: 0,
                tool_names: vec![],
            }
        );

        registry
            .register(Arc::new(RandomNumberTool::new()))
            .expect("registration");
        assert_eq!(
            registry.stats(),
            RegistryStats {
                total_tools: 1,
                tool_names: vec!["generateRandomNumber".to_string()],
            }
        );

        registry.clear();
        registry.clear();
        assert!(registry.list().is_empty());
    }
}
