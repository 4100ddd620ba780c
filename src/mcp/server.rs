use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

use crate::error::{McpError, Result};
use crate::mcp::types::{
    INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    McpTool, McpToolCallParams, McpToolCallResult, McpToolsListResult, METHOD_NOT_FOUND,
    PARSE_ERROR, ServerCapabilities, ServerInfo, ToolsCapability,
};
use crate::tools::{ToolManager, ToolParameters};

pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP 服务端
///
/// 通过换行分隔的 JSON-RPC 暴露 [`ToolManager`] 中注册的工具。
/// 每个请求在独立的 tokio task 中处理，响应按完成顺序写回。
pub struct McpServer {
    tools: Arc<ToolManager>,
    info: ServerInfo,
}

impl McpServer {
    pub fn new(tools: Arc<ToolManager>, name: impl Into<String>) -> Self {
        Self {
            tools,
            info: ServerInfo {
                name: name.into(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        }
    }

    /// 在当前进程的 stdin / stdout 上提供服务，直到 stdin 关闭
    pub async fn serve_stdio(self: Arc<Self>) -> Result<()> {
        self.serve(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await
    }

    pub async fn serve<R, W>(self: Arc<Self>, mut reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin + Send + 'static,
    {
        tracing::info!("MCP: 服务端 '{}' 已启动", self.info.name);

        let (tx, mut rx) = mpsc::unbounded_channel::<JsonRpcResponse>();

        let writer_task = tokio::spawn(async move {
            while let Some(response) = rx.recv().await {
                let line = serde_json::to_string(&response)
                    .map_err(|e| McpError::ProtocolError(e.to_string()))?
                    + "\n";
                writer.write_all(line.as_bytes()).await.map_err(|e| {
                    McpError::ProtocolError(format!("写入 stdout 失败: {}", e))
                })?;
                writer
                    .flush()
                    .await
                    .map_err(|e| McpError::ProtocolError(format!("flush stdout 失败: {}", e)))?;
            }
            Ok::<(), McpError>(())
        });

        // 按字节读取：单行编码错误只影响这一行
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }

            let line = match std::str::from_utf8(&buf) {
                Ok(text) => text.trim().to_string(),
                Err(e) => {
                    tracing::warn!("MCP: 请求不是合法的 UTF-8: {}", e);
                    let _ = tx.send(JsonRpcResponse::error(
                        None,
                        PARSE_ERROR,
                        format!("invalid UTF-8: {}", e),
                    ));
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }

            let server = self.clone();
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Some(response) = server.handle_line(&line).await {
                    // 写入端已退出时丢弃响应
                    let _ = tx.send(response);
                }
            });
        }

        tracing::debug!("MCP: stdin 已关闭，等待未完成的请求");
        drop(tx);
        writer_task
            .await
            .map_err(|_| McpError::TransportClosed)??;
        Ok(())
    }

    /// 处理一行原始输入；通知返回 `None`
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let json: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!("MCP: 无法解析请求: {} | 原始内容: {}", e, line);
                return Some(JsonRpcResponse::error(None, PARSE_ERROR, e.to_string()));
            }
        };

        let id = json.get("id").cloned();
        match serde_json::from_value::<JsonRpcRequest>(json) {
            Ok(request) => self.handle_request(request).await,
            Err(e) => Some(JsonRpcResponse::error(id, INVALID_REQUEST, e.to_string())),
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!("MCP: 收到通知: {}", request.method);
            return None;
        }

        let id = request.id.clone();
        let response = match request.method.as_str() {
            "initialize" => self.initialize(id),
            "ping" => JsonRpcResponse::success(id, serde_json::json!({})),
            "tools/list" => self.list_tools(id),
            "tools/call" => self.call_tool(id, request.params).await,
            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };
        Some(response)
    }

    fn initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = InitializeResult {
            protocol_version: PROTOCOL_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability {
                    list_changed: Some(false),
                }),
            },
            server_info: Some(self.info.clone()),
        };
        to_response(id, &result)
    }

    fn list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = McpToolsListResult {
            tools: self.tools.tools().map(McpTool::from_tool).collect(),
            next_cursor: None,
        };
        to_response(id, &result)
    }

    async fn call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: McpToolCallParams =
            match serde_json::from_value(params.unwrap_or(Value::Null)) {
                Ok(p) => p,
                Err(e) => {
                    return JsonRpcResponse::error(id, INVALID_PARAMS, e.to_string());
                }
            };

        if self.tools.get_tool(&params.name).is_none() {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                format!("Unknown tool: {}", params.name),
            );
        }

        let arguments: ToolParameters = match params.arguments {
            None | Some(Value::Null) => HashMap::new(),
            Some(Value::Object(map)) => map.into_iter().collect(),
            Some(_) => {
                return JsonRpcResponse::error(
                    id,
                    INVALID_PARAMS,
                    "arguments must be an object",
                );
            }
        };

        tracing::info!("MCP: 调用工具 '{}'", params.name);
        let result = match self.tools.execute_tool(&params.name, arguments).await {
            Ok(r) => McpToolCallResult::from(r),
            Err(e) => {
                tracing::warn!("MCP: 工具 '{}' 执行失败: {}", params.name, e);
                McpToolCallResult::text(e.to_string(), true)
            }
        };
        to_response(id, &result)
    }
}

fn to_response<T: serde::Serialize>(id: Option<Value>, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, INTERNAL_ERROR, e.to_string()),
    }
}
