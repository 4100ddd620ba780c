pub mod config;
pub mod types;

use crate::error::{AssistantError, LlmError, Result};
use crate::llm::config::ModelConfig;
use crate::llm::types::{ChatCompletionRequest, ChatCompletionResponse, Message};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::HeaderMap;
use std::sync::Arc;
use tracing::debug;

pub fn assemble_req_header(model: &ModelConfig) -> Result<HeaderMap> {
    let mut header_map = HeaderMap::new();

    if !model.apikey.is_empty() {
        header_map.insert(
            "Authorization",
            format!("Bearer {}", model.apikey).parse().map_err(|e| {
                AssistantError::Other(format!("Invalid Authorization header: {}", e))
            })?,
        );
    }
    header_map.insert(
        "Content-Type",
        "application/json"
            .parse()
            .map_err(|e| AssistantError::Other(format!("Invalid Content-Type header: {}", e)))?,
    );
    Ok(header_map)
}

/// 一次非流式 Chat Completions 请求
///
/// 非 2xx 返回 [`LlmError::ApiError`]（附带响应体），响应体无法解析返回 [`LlmError::InvalidResponse`]。
pub async fn chat(
    client: &Client,
    model: &ModelConfig,
    messages: Vec<Message>,
) -> Result<ChatCompletionResponse> {
    let request = ChatCompletionRequest {
        model: model.model.clone(),
        messages,
        temperature: model.temperature,
        max_tokens: model.max_tokens,
        stream: Some(false),
    };

    let response = client
        .post(&model.baseurl)
        .headers(assemble_req_header(model)?)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        return Err(LlmError::ApiError {
            status: status.as_u16(),
            message: body,
        }
        .into());
    }

    debug!(model = %model.model, bytes = body.len(), "LLM 响应已返回");
    serde_json::from_str(&body).map_err(|e| LlmError::InvalidResponse(e.to_string()).into())
}

/// 路由器与城市抽取器依赖的 LLM 调用接口
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// 发起一次无工具的单轮对话，返回模型的文本内容
    async fn chat_simple(&self, messages: Vec<Message>) -> Result<String>;
}

/// 基于 `chat` 函数的默认实现（OpenAI 兼容接口）
pub struct DefaultLlmClient {
    client: Arc<Client>,
    model: ModelConfig,
}

impl DefaultLlmClient {
    pub fn new(client: Arc<Client>, model: ModelConfig) -> Self {
        Self { client, model }
    }
}

#[async_trait]
impl LlmClient for DefaultLlmClient {
    async fn chat_simple(&self, messages: Vec<Message>) -> Result<String> {
        let response = chat(&self.client, &self.model, messages).await?;

        response
            .first_content()
            .ok_or(AssistantError::Llm(LlmError::EmptyResponse))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn model_for(server: &MockServer, apikey: &str) -> ModelConfig {
        ModelConfig {
            baseurl: format!("{}/v1/chat/completions", server.uri()),
            apikey: apikey.to_string(),
            ..ModelConfig::default()
        }
    }

    #[test]
    fn test_header_without_apikey() {
        let headers = assemble_req_header(&ModelConfig::default()).unwrap();
        assert!(headers.get("Authorization").is_none());
        assert_eq!(headers["Content-Type"], "application/json");
    }

    #[tokio::test]
    async fn test_chat_simple_returns_first_choice() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer sk-test"))
            .and(body_partial_json(serde_json::json!({
                "model": "llama3.2:3b",
                "stream": false
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "chatcmpl-1",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Paris"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let llm = DefaultLlmClient::new(Arc::new(Client::new()), model_for(&server, "sk-test"));
        let text = llm
            .chat_simple(vec![Message::user("capital of France?".to_string())])
            .await
            .unwrap();
        assert_eq!(text, "Paris");
    }

    #[tokio::test]
    async fn test_chat_simple_propagates_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
            .mount(&server)
            .await;

        let llm = DefaultLlmClient::new(Arc::new(Client::new()), model_for(&server, ""));
        let err = llm
            .chat_simple(vec![Message::user("hi".to_string())])
            .await
            .unwrap_err();
        match err {
            AssistantError::Llm(LlmError::ApiError { status, message }) => {
                assert_eq!(status, 500);
                assert_eq!(message, "model not loaded");
            }
            other => panic!("应该返回 ApiError，实际: {}", other),
        }
    }

    #[tokio::test]
    async fn test_chat_simple_empty_choices() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
            )
            .mount(&server)
            .await;

        let llm = DefaultLlmClient::new(Arc::new(Client::new()), model_for(&server, ""));
        let err = llm.chat_simple(vec![]).await.unwrap_err();
        assert!(matches!(err, AssistantError::Llm(LlmError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_chat_simple_invalid_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let llm = DefaultLlmClient::new(Arc::new(Client::new()), model_for(&server, ""));
        let err = llm.chat_simple(vec![]).await.unwrap_err();
        assert!(matches!(
            err,
            AssistantError::Llm(LlmError::InvalidResponse(_))
        ));
    }
}
