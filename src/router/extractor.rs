use crate::error::Result;
use crate::llm::LlmClient;
use crate::llm::types::Message;
use std::sync::Arc;
use tracing::debug;

/// 模型表示"问题中没有城市"的哨兵值
pub const NO_CITY: &str = "NONE";

const MAX_CITY_CHARS: usize = 85;
const MAX_CITY_WORDS: usize = 5;

const EXTRACTOR_SYSTEM_PROMPT: &str =
    "You are a city name extractor. Respond with ONLY the city name or \"NONE\".";

/// 用一次 LLM 调用从问题中抽取城市名
pub struct CityExtractor {
    llm: Arc<dyn LlmClient>,
}

impl CityExtractor {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self { llm }
    }

    /// 模型原始输出（仅去除首尾空白）
    pub async fn extract_raw(&self, question: &str) -> Result<String> {
        let prompt = format!(
            "Extract the city name from this question. If no city is mentioned, respond with 'NONE'.\n\
             Question: {}\n\n\
             Respond with ONLY the city name or 'NONE'.",
            question
        );

        let response = self
            .llm
            .chat_simple(vec![
                Message::system(EXTRACTOR_SYSTEM_PROMPT.to_string()),
                Message::user(prompt),
            ])
            .await?;
        Ok(response.trim().to_string())
    }

    /// 抽取并清洗城市名；无城市或输出不可信时返回 `None`
    pub async fn extract(&self, question: &str) -> Result<Option<String>> {
        let raw = self.extract_raw(question).await?;
        let city = sanitize_city(&raw);
        debug!("城市抽取: 原始输出 {:?} -> {:?}", raw, city);
        Ok(city)
    }
}

/// 清洗模型输出的城市名。
///
/// 去掉包裹的引号 / 反引号 / 星号和末尾句号后，以下情况视为 `NONE`：
/// 空串、`NONE`（忽略大小写）、多行、含 `and` / `or`（多个候选城市）、超过 85 个字符、超过 5 个单词、
/// 含字母 / 空格 / `-` / `'` / `.` 以外的字符（逗号、数字、问号等）。
pub fn sanitize_city(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.contains(['\n', '\r']) {
        return None;
    }

    let quote = |c: char| matches!(c, '"' | '\'' | '`' | '*');
    let city = trimmed
        .trim_start_matches(quote)
        .trim_end_matches(|c: char| quote(c) || c == '.')
        .trim();

    if city.is_empty() || city.eq_ignore_ascii_case(NO_CITY) {
        return None;
    }
    if city
        .split_whitespace()
        .any(|word| word.eq_ignore_ascii_case("and") || word.eq_ignore_ascii_case("or"))
    {
        return None;
    }
    if city.chars().count() > MAX_CITY_CHARS || city.split_whitespace().count() > MAX_CITY_WORDS {
        return None;
    }
    let allowed = |c: char| c.is_alphabetic() || matches!(c, ' ' | '-' | '\'' | '.');
    if !city.chars().all(allowed) {
        return None;
    }

    Some(city.to_string())
}
