pub mod config;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod router;
pub mod testing;
pub mod tools;
pub mod weather;

pub mod prelude {
    pub use crate::config::AppConfig;
    pub use crate::error::{AssistantError, Result};
    pub use crate::llm::{DefaultLlmClient, LlmClient};
    pub use crate::router::{QueryRouter, RoutingDecision};
    pub use crate::tools::{Tool, ToolManager, ToolParameters, ToolResult};
    pub use crate::weather::{WeatherOutcome, WeatherService};
}
