//! MCP（Model Context Protocol）服务端
//!
//! 通过 stdio 上的 JSON-RPC 2.0 暴露 `get-weather` 与 `process-query` 两个工具。
//! 典型用法：
//! ```no_run
//! # use std::sync::Arc;
//! # use weather_assistant::mcp::McpServer;
//! # use weather_assistant::tools::ToolManager;
//! # async fn run(tools: ToolManager) -> weather_assistant::error::Result<()> {
//! let server = Arc::new(McpServer::new(Arc::new(tools), "weather-assistant"));
//! server.serve_stdio().await?;
//! # Ok(())
//! # }
//! ```

pub mod server;
pub mod types;

pub use server::{McpServer, PROTOCOL_VERSION};
pub use types::{JsonRpcRequest, JsonRpcResponse, McpContent, McpTool, McpToolCallResult};
