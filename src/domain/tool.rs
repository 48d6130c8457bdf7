//! Tool capability interface and the shared execution guard
//!
//! Every tool advertises a definition and runs through [`guarded_execute`], which
//! checks required arguments and folds failures into an error-flagged result.

use std::future::Future;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ToolError;

pub type ToolArguments = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<bool>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl ToolSchema {
    /// An object schema with no declared properties.
    pub fn empty_object() -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: Some(Map::new()),
            additional_properties: None,
            required: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: ToolSchema,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ToolContent {
    Text { text: String },
}

impl ToolContent {
    pub fn text(&self) -> &str {
        match self {
            Self::Text { text } => text,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<ToolContent>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: false,
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            content: vec![ToolContent::Text { text: text.into() }],
            is_error: true,
        }
    }

    /// Text of the first content entry, if any.
    pub fn first_text(&self) -> Option<&str> {
        self.content.first().map(ToolContent::text)
    }
}

/// A named, schema-described unit of invocable logic.
///
/// `execute` must not fail: implementations route their body through
/// [`guarded_execute`] so validation and body errors come back as results.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn input_schema(&self) -> &ToolSchema;

    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
            input_schema: self.input_schema().clone(),
        }
    }

    async fn execute(&self, args: ToolArguments) -> ToolResult;
}

pub fn validate_arguments(schema: &ToolSchema, args: &ToolArguments) -> Result<(), ToolError> {
    match schema.required.iter().find(|field| !args.contains_key(*field)) {
        Some(field) => Err(ToolError::Validation {
            field: field.clone(),
        }),
        None => Ok(()),
    }
}

pub async fn guarded_execute<F, Fut>(
    tool_name: &str,
    schema: &ToolSchema,
    args: ToolArguments,
    body: F,
) -> ToolResult
where
    F: FnOnce(ToolArguments) -> Fut,
    Fut: Future<Output = Result<ToolResult, ToolError>>,
{
    let outcome = match validate_arguments(schema, &args) {
        Ok(()) => body(args).await,
        Err(err) => Err(err),
    };

    outcome.unwrap_or_else(|err| {
        tracing::debug!(tool = tool_name, error = %err, "tool execution failed");
        ToolResult::error(format!("error executing tool {tool_name}: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};

    use super::*;
    use serde_json::json;

    fn schema_requiring(fields: &[&str]) -> ToolSchema {
        ToolSchema {
            required: fields.iter().map(|field| field.to_string()).collect(),
            ..ToolSchema::empty_object()
        }
    }

    fn args(value: Value) -> ToolArguments {
        value.as_object().cloned().expect("object arguments")
    }

    #[test]
    fn validation_reports_first_missing_field() {
        let schema = schema_requiring(&["min", "max"]);
        let err = validate_arguments(&schema, &args(json!({"min": 1})))
            .expect_err("max is missing");
        assert_eq!(
            err,
            ToolError::Validation {
                field: "max".to_string()
            }
        );
    }

    #[test]
    fn validation_accepts_null_valued_fields() {
        let schema = schema_requiring(&["min"]);
        assert!(validate_arguments(&schema, &args(json!({"min": null}))).is_ok());
    }

    #[tokio::test]
    async fn guard_skips_body_when_validation_fails() {
        let schema = schema_requiring(&["min"]);
        let ran = AtomicBool::new(false);
        let result = guarded_execute("sample", &schema, ToolArguments::new(), |_| async {
            ran.store(true, Ordering::SeqCst);
            Ok::<_, ToolError>(ToolResult::text("ran"))
        })
        .await;

        assert!(!ran.load(Ordering::SeqCst));
        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            Some("error executing tool sample: required field 'min' not provided")
        );
    }

    #[tokio::test]
    async fn guard_converts_body_errors() {
        let schema = ToolSchema::empty_object();
        let result = guarded_execute("sample", &schema, ToolArguments::new(), |_| async {
            Err::<ToolResult, _>(ToolError::Execution("disk on fire".to_string()))
        })
        .await;

        assert!(result.is_error);
        assert_eq!(
            result.first_text(),
            Some("error executing tool sample: disk on fire")
        );
    }

    #[test]
    fn result_serializes_without_error_flag_on_success() {
        let value = serde_json::to_value(ToolResult::text("hi")).expect("serialize");
        assert_eq!(value, json!({"content": [{"type": "text", "text": "hi"}]}));

        let value = serde_json::to_value(ToolResult::error("bad")).expect("serialize");
        assert_eq!(
            value,
            json!({"content": [{"type": "text", "text": "bad"}], "isError": true})
        );
    }

    #[test]
    fn definition_uses_camel_case_schema_keys() {
        let definition = ToolDefinition {
            name: "t".to_string(),
            description: "d".to_string(),
            input_schema: ToolSchema {
                additional_properties: Some(true),
                ..ToolSchema::empty_object()
            },
        };

        let value = serde_json::to_value(definition).expect("serialize");
        assert_eq!(
            value,
            json!({
                "name": "t",
                "description": "d",
                "inputSchema": {"type": "object", "properties": {}, "additionalProperties": true}
            })
        );
    }
}
