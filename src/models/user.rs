//! User administration models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 后台用户（管理端视图）
#[derive(Debug, Clone, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub is_active: bool,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    #[serde(default)]
    pub groups: Vec<AdminGroup>,
}

/// 用户组
#[derive(Debug, Clone, Deserialize)]
pub struct AdminGroup {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub user_count: u64,
}

/// 用户创建/更新载荷
#[derive(Debug, Clone, Serialize, Validate)]
pub struct UserPayload {
    #[validate(length(min = 3, max = 150, message = "username must be 3-150 characters"))]
    pub username: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// 仅创建或重置时携带
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub group_ids: Vec<i64>,
    pub is_active: bool,
}

impl UserPayload {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            first_name: None,
            last_name: None,
            password: None,
            group_ids: Vec::new(),
            is_active: true,
        }
    }
}

/// 审计日志条目（GET /api/audit-logs/）
#[derive(Debug, Clone, Deserialize)]
pub struct AuditLogEntry {
    pub user: String,
    pub action: String,
    pub model: String,
    pub object_id: i64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub changes: Option<serde_json::Value>,
}
