//! 统一错误模型
//! 定义客户端所有错误类型与结果别名

use thiserror::Error;

/// 结果类型别名
pub type Result<T> = std::result::Result<T, ClientError>;

/// 客户端错误类型
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Authentication failed")]
    Unauthorized,

    #[error("Session refresh rejected")]
    RefreshRejected,

    #[error("Malformed server response: {0}")]
    MalformedResponse(String),

    #[error("Access denied")]
    Forbidden,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    #[error("Credential store error: {0}")]
    Storage(String),
}

impl ClientError {
    /// 该错误是否表示认证失效（调用方可据此提示重新登录）
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ClientError::Unauthorized | ClientError::RefreshRejected)
    }

    // 便捷方法
    pub fn validation(msg: impl Into<String>) -> Self {
        ClientError::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ClientError::NotFound(msg.into())
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        ClientError::MalformedResponse(msg.into())
    }
}

impl From<validator::ValidationErrors> for ClientError {
    fn from(errors: validator::ValidationErrors) -> Self {
        ClientError::Validation(errors.to_string())
    }
}
