//! 配置系统
//! 启动时从环境变量一次性加载全部配置，之后显式传递，不再隐式读取环境

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// API 配置
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    /// 服务端基础地址，例如 "http://localhost:8000"
    pub base_url: String,
    /// 单个请求超时时间（秒）
    pub request_timeout_secs: u64,
}

/// 会话配置
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// 闲置自动登出时间（分钟）
    pub idle_timeout_minutes: u64,
    /// 登出前预警提前量（分钟），0 表示不预警
    pub idle_warn_minutes: u64,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别: trace, debug, info, warn, error
    pub level: String,
    /// 日志格式: json, pretty
    pub format: String,
}

/// 本地存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 凭据文件路径（文件存储后端使用）
    pub credentials_file: String,
}

/// 客户端总配置
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
}

impl ClientConfig {
    /// 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut settings = Config::builder();

        // 添加默认配置
        settings = settings
            .set_default("api.base_url", "http://localhost:8000")?
            .set_default("api.request_timeout_secs", 30)?
            .set_default("session.idle_timeout_minutes", 30)?
            .set_default("session.idle_warn_minutes", 1)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            .set_default("storage.credentials_file", ".mms-credentials.json")?;

        // 从环境变量加载配置（前缀为 MMS_）
        settings = settings.add_source(
            Environment::with_prefix("MMS")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: ClientConfig = settings.build()?.try_deserialize()?;

        // 验证配置
        config.validate()?;

        Ok(config)
    }

    /// 验证配置合法性
    fn validate(&self) -> Result<(), ConfigError> {
        // 验证基础地址可解析
        if url::Url::parse(&self.api.base_url).is_err() {
            return Err(ConfigError::Message(format!(
                "Invalid api.base_url: {}",
                self.api.base_url
            )));
        }

        // 验证日志级别
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(ConfigError::Message(format!(
                    "Invalid logging.level: {}",
                    self.logging.level
                )));
            }
        }

        if self.api.request_timeout_secs == 0 {
            return Err(ConfigError::Message(
                "api.request_timeout_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}
