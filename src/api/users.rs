//! User administration endpoints (admin only)

use super::ApiClient;
use crate::error::Result;
use crate::models::user::{AdminGroup, AdminUser, UserPayload};
use crate::models::{Page, PageQuery};
use serde_json::json;
use validator::Validate;

impl ApiClient {
    /// 用户分页列表
    pub async fn list_users(&self, query: &PageQuery) -> Result<Page<AdminUser>> {
        self.get_json_query("api/admin/users/", query).await
    }

    pub async fn get_user(&self, id: i64) -> Result<AdminUser> {
        self.get_json(&format!("api/admin/users/{id}/")).await
    }

    pub async fn create_user(&self, payload: &UserPayload) -> Result<AdminUser> {
        payload.validate()?;
        self.post_json("api/admin/users/", payload).await
    }

    pub async fn update_user(&self, id: i64, payload: &UserPayload) -> Result<AdminUser> {
        payload.validate()?;
        self.put_json(&format!("api/admin/users/{id}/"), payload)
            .await
    }

    pub async fn delete_user(&self, id: i64) -> Result<()> {
        self.delete(&format!("api/admin/users/{id}/")).await
    }

    /// 管理员重置他人密码
    pub async fn change_user_password(&self, id: i64, new_password: &str) -> Result<()> {
        self.post_unit(
            &format!("api/admin/users/{id}/change_password/"),
            &json!({ "password": new_password }),
        )
        .await
    }

    /// 启用/停用账号
    pub async fn toggle_user_active(&self, id: i64) -> Result<AdminUser> {
        self.post_empty(&format!("api/admin/users/{id}/toggle_active/"))
            .await
    }

    /// 调整用户所属组
    pub async fn assign_user_groups(&self, id: i64, group_ids: &[i64]) -> Result<AdminUser> {
        self.post_json(
            &format!("api/admin/users/{id}/assign_groups/"),
            &json!({ "group_ids": group_ids }),
        )
        .await
    }

    /// 用户组列表
    pub async fn list_groups(&self) -> Result<Vec<AdminGroup>> {
        self.get_json("api/admin/groups/").await
    }

    /// 审计日志
    pub async fn list_audit_logs(&self) -> Result<Vec<crate::models::user::AuditLogEntry>> {
        self.get_json("api/audit-logs/").await
    }
}
