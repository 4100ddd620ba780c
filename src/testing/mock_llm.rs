//! 按脚本应答的 [`LlmClient`]。
//!
//! 路由器对 LLM 只有一个入口 `chat_simple`：一条 system + 一条 user 消息进，一段文本出。
//! Mock 因此只需要两样东西：依次弹出的应答脚本，以及每次收到的消息。
//!
//! ```rust
//! use weather_assistant::testing::MockLlmClient;
//! use weather_assistant::llm::LlmClient;
//! use weather_assistant::llm::types::Message;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let mock = MockLlmClient::new().with_responses(["Seattle", "Rain all day."]);
//!
//! let city = mock
//!     .chat_simple(vec![
//!         Message::system("extract".to_string()),
//!         Message::user("Rain in Seattle?".to_string()),
//!     ])
//!     .await
//!     .unwrap();
//! assert_eq!(city, "Seattle");
//! assert_eq!(mock.last_user_prompt().as_deref(), Some("Rain in Seattle?"));
//! # }
//! ```

use crate::error::{LlmError, Result};
use crate::llm::LlmClient;
use crate::llm::types::Message;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Default)]
struct Script {
    replies: VecDeque<std::result::Result<String, LlmError>>,
    seen: Vec<Vec<Message>>,
}

/// 脚本耗尽后返回 [`LlmError::EmptyResponse`]
#[derive(Default)]
pub struct MockLlmClient {
    script: Mutex<Script>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn push(self, reply: std::result::Result<String, LlmError>) -> Self {
        self.script().replies.push_back(reply);
        self
    }

    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()))
    }

    pub fn with_responses(self, texts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        texts.into_iter().fold(self, |mock, text| mock.with_response(text))
    }

    /// 模拟 LLM 服务不可达
    pub fn with_network_error(self, message: impl Into<String>) -> Self {
        self.push(Err(LlmError::NetworkError(message.into())))
    }

    pub fn call_count(&self) -> usize {
        self.script().seen.len()
    }

    pub fn last_messages(&self) -> Option<Vec<Message>> {
        self.script().seen.last().cloned()
    }

    /// 最近一次调用中 user 消息的文本
    pub fn last_user_prompt(&self) -> Option<String> {
        self.script()
            .seen
            .last()?
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .and_then(|m| m.content.clone())
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn chat_simple(&self, messages: Vec<Message>) -> Result<String> {
        let mut script = self.script();
        script.seen.push(messages);
        match script.replies.pop_front() {
            Some(reply) => reply.map_err(Into::into),
            None => Err(LlmError::EmptyResponse.into()),
        }
    }
}
