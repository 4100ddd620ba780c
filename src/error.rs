use std::fmt;

/// 天气问答助手的统一错误类型
#[derive(Debug)]
pub enum AssistantError {
    /// LLM 相关错误
    Llm(LlmError),
    /// 天气数据（地理编码 / 预报）错误
    Weather(WeatherError),
    /// 工具执行错误
    Tool(ToolError),
    /// 解析错误
    Parse(ParseError),
    /// 配置错误
    Config(ConfigError),
    /// MCP 协议错误
    Mcp(McpError),
    /// IO 错误
    Io(std::io::Error),
    /// 其他错误
    Other(String),
}

/// LLM 相关错误
#[derive(Debug)]
pub enum LlmError {
    /// 网络请求失败
    NetworkError(String),
    /// API 返回错误状态码
    ApiError { status: u16, message: String },
    /// 响应格式无效
    InvalidResponse(String),
    /// 没有返回内容
    EmptyResponse,
}

/// 天气数据错误
///
/// `CityNotFound` 与 `RequestFailed` 是预期内的分支，由编排器转换为
/// [`WeatherOutcome`](crate::weather::WeatherOutcome)；`MalformedResponse` 则作为故障向上传播。
#[derive(Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// 地理编码无结果或请求失败
    CityNotFound(String),
    /// 预报接口请求失败（携带上游错误信息）
    RequestFailed(String),
    /// 上游返回的 JSON 结构不符合预期
    MalformedResponse(String),
}

/// 工具执行错误
#[derive(Debug)]
pub enum ToolError {
    /// 工具未找到
    NotFound(String),
    /// 参数缺失
    MissingParameter(String),
    /// 参数类型错误
    InvalidParameter { name: String, message: String },
}

/// 解析错误
#[derive(Debug)]
pub enum ParseError {
    /// JSON 解析错误
    JsonError(String),
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 配置文件未找到
    FileNotFound(String),
    /// 配置解析失败
    ParseFailed(String),
    /// 配置值无效
    InvalidValue { field: String, message: String },
}

/// MCP 协议错误
#[derive(Debug)]
pub enum McpError {
    /// 协议层错误（序列化、写入失败等）
    ProtocolError(String),
    /// 传输层已关闭
    TransportClosed,
}

impl fmt::Display for AssistantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssistantError::Llm(e) => write!(f, "LLM Error: {}", e),
            AssistantError::Weather(e) => write!(f, "Weather Error: {}", e),
            AssistantError::Tool(e) => write!(f, "Tool Error: {}", e),
            AssistantError::Parse(e) => write!(f, "Parse Error: {}", e),
            AssistantError::Config(e) => write!(f, "Config Error: {}", e),
            AssistantError::Mcp(e) => write!(f, "MCP Error: {}", e),
            AssistantError::Io(e) => write!(f, "IO Error: {}", e),
            AssistantError::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            LlmError::ApiError { status, message } => {
                write!(f, "API error (status {}): {}", status, message)
            }
            LlmError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            LlmError::EmptyResponse => write!(f, "Empty response from LLM"),
        }
    }
}

impl fmt::Display for WeatherError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WeatherError::CityNotFound(city) => {
                write!(f, "Could not find coordinates for {}", city)
            }
            WeatherError::RequestFailed(msg) => write!(f, "Weather request failed: {}", msg),
            WeatherError::MalformedResponse(msg) => {
                write!(f, "Malformed weather service response: {}", msg)
            }
        }
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolError::NotFound(name) => write!(f, "Tool '{}' not found", name),
            ToolError::MissingParameter(name) => write!(f, "Missing parameter: {}", name),
            ToolError::InvalidParameter { name, message } => {
                write!(f, "Invalid parameter '{}': {}", name, message)
            }
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::JsonError(msg) => write!(f, "JSON parse error: {}", msg),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::FileNotFound(path) => write!(f, "Config file not found: {}", path),
            ConfigError::ParseFailed(msg) => write!(f, "Failed to parse config: {}", msg),
            ConfigError::InvalidValue { field, message } => {
                write!(f, "Invalid config value for '{}': {}", field, message)
            }
        }
    }
}

impl fmt::Display for McpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            McpError::ProtocolError(msg) => write!(f, "Protocol error: {}", msg),
            McpError::TransportClosed => write!(f, "Transport closed"),
        }
    }
}

impl std::error::Error for AssistantError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssistantError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl std::error::Error for LlmError {}
impl std::error::Error for WeatherError {}
impl std::error::Error for ToolError {}
impl std::error::Error for ParseError {}
impl std::error::Error for ConfigError {}
impl std::error::Error for McpError {}

// From 转换实现
impl From<std::io::Error> for AssistantError {
    fn from(err: std::io::Error) -> Self {
        AssistantError::Io(err)
    }
}

impl From<reqwest::Error> for AssistantError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            AssistantError::Llm(LlmError::NetworkError("Request timeout".to_string()))
        } else if err.is_connect() {
            AssistantError::Llm(LlmError::NetworkError(format!(
                "Connection failed: {}",
                err
            )))
        } else {
            AssistantError::Llm(LlmError::NetworkError(err.to_string()))
        }
    }
}

impl From<serde_json::Error> for AssistantError {
    fn from(err: serde_json::Error) -> Self {
        AssistantError::Parse(ParseError::JsonError(err.to_string()))
    }
}

impl From<serde_yaml::Error> for AssistantError {
    fn from(err: serde_yaml::Error) -> Self {
        AssistantError::Config(ConfigError::ParseFailed(err.to_string()))
    }
}

impl From<LlmError> for AssistantError {
    fn from(err: LlmError) -> Self {
        AssistantError::Llm(err)
    }
}

impl From<WeatherError> for AssistantError {
    fn from(err: WeatherError) -> Self {
        AssistantError::Weather(err)
    }
}

impl From<ToolError> for AssistantError {
    fn from(err: ToolError) -> Self {
        AssistantError::Tool(err)
    }
}

impl From<ParseError> for AssistantError {
    fn from(err: ParseError) -> Self {
        AssistantError::Parse(err)
    }
}

impl From<ConfigError> for AssistantError {
    fn from(err: ConfigError) -> Self {
        AssistantError::Config(err)
    }
}

impl From<McpError> for AssistantError {
    fn from(err: McpError) -> Self {
        AssistantError::Mcp(err)
    }
}

// 便捷的 Result 类型别名
pub type Result<T> = std::result::Result<T, AssistantError>;
