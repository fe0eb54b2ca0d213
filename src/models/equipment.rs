//! Equipment registry models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 设备
#[derive(Debug, Clone, Deserialize)]
pub struct Equipment {
    pub id: i64,
    /// 设备编码（全局唯一）
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 设备创建/更新载荷
#[derive(Debug, Clone, Serialize, Validate)]
pub struct EquipmentPayload {
    #[validate(length(min = 1, max = 50, message = "code must be 1-50 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 100, message = "name must be 1-100 characters"))]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}
