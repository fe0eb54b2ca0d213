//! 维护管理系统客户端库
//! 提供认证会话协调（合并刷新、闲置登出）、凭据存储与 REST API 访问

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod telemetry;

pub use api::ApiClient;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use session::{
    ActivityHandle, ActivityKind, CredentialStore, Credentials, FileCredentialStore, IdlePolicy,
    MemoryCredentialStore, Session, SessionOptions,
};
