use async_trait::async_trait;
use rand::Rng;

use crate::domain::tool::{guarded_execute, Tool, ToolArguments, ToolResult, ToolSchema};
use crate::errors::ToolError;

pub const RANDOM_NUMBER_TOOL_NAME: &str = "generateRandomNumber";
pub const RANDOM_NUMBER_MIN: u32 = 1;
pub const RANDOM_NUMBER_MAX: u32 = 100;

/// Draws a uniformly distributed integer in `[1, 100]`.
pub struct RandomNumberTool {
    schema: ToolSchema,
}

impl RandomNumberTool {
    pub fn new() -> Self {
        Self {
            schema: ToolSchema {
                additional_properties: Some(false),
                ..ToolSchema::empty_object()
            },
        }
    }

    pub fn draw() -> u32 {
        rand::thread_rng().gen_range(RANDOM_NUMBER_MIN..=RANDOM_NUMBER_MAX)
    }
}

impl Default for RandomNumberTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for RandomNumberTool {
    fn name(&self) -> &str {
        RANDOM_NUMBER_TOOL_NAME
    }

    fn description(&self) -> &str {
        "Generates a random number between 1 and 100"
    }

    fn input_schema(&self) -> &ToolSchema {
        &self.schema
    }

    async fn execute(&self, args: ToolArguments) -> ToolResult {
        guarded_execute(self.name(), &self.schema, args, |_| async {
            Ok::<_, ToolError>(ToolResult::text(format!(
                "Random number generated: {}",
                Self::draw()
            )))
        })
        .await
    }
}
