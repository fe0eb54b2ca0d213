//! Authentication-related models

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 登录请求
#[derive(Debug, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "username must not be empty"))]
    pub username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub password: String,
}

/// 登录响应中附带的用户信息
#[derive(Debug, Clone, Deserialize)]
pub struct LoginUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub is_staff: bool,
    #[serde(default)]
    pub is_superuser: bool,
}

/// 登录响应
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access: String,
    pub refresh: String,
    pub role: String,
    #[serde(default)]
    pub user: Option<LoginUser>,
}

/// 令牌刷新请求
#[derive(Debug, Serialize)]
pub struct RefreshRequest {
    pub refresh: String,
}

/// 令牌刷新响应
///
/// 服务端未开启刷新令牌轮换，只返回新的访问令牌
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshResponse {
    pub access: String,
}

/// 当前用户摘要（GET /api/user-info/）
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub groups: Vec<String>,
}

/// 修改本人密码请求
#[derive(Debug, Serialize, Validate)]
pub struct ChangePasswordRequest {
    #[validate(length(min = 1, message = "old password must not be empty"))]
    pub old_password: String,
    #[validate(length(min = 8, message = "new password must be at least 8 characters"))]
    pub new_password: String,
}

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Technician,
}

impl Role {
    /// 归一化服务端/历史数据中出现过的角色写法；无法识别时返回 None
    pub fn parse(raw: &str) -> Option<Role> {
        match raw.trim().to_lowercase().as_str() {
            "admin" | "administrador" | "administrator" => Some(Role::Admin),
            "technician" | "tecnico" | "técnico" | "technico" => Some(Role::Technician),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Technician => "technician",
        }
    }

    // 角色能力：与界面按角色隐藏的入口一一对应

    pub fn can_manage_users(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_manage_backups(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_manage_locations(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn can_record_maintenance(&self) -> bool {
        matches!(self, Role::Admin | Role::Technician)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
