//! 数据模型模块
//! 与服务端交换的线上数据结构，按资源拆分

pub mod auth;
pub mod backup;
pub mod dashboard;
pub mod equipment;
pub mod location;
pub mod maintenance;
pub mod report;
pub mod user;

pub use auth::{
    ChangePasswordRequest, LoginRequest, LoginResponse, LoginUser, RefreshRequest,
    RefreshResponse, Role, UserInfo,
};
pub use backup::BackupFile;
pub use dashboard::{DashboardStats, MaintenanceTimelinePoint, TypeCount};
pub use equipment::{Equipment, EquipmentPayload};
pub use location::{Dependencia, LocationPayload, Sede, Subdependencia};
pub use maintenance::{Maintenance, MaintenancePayload, MaintenanceType, Photo};
pub use report::{GenerateReportRequest, ReportEntry, ReportFormat};
pub use user::{AdminGroup, AdminUser, AuditLogEntry, UserPayload};

use serde::{Deserialize, Serialize};

/// 分页响应（服务端 PageNumberPagination 格式）
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// 分页查询参数
///
/// 服务端默认每页 10 条，最大 100 条
#[derive(Debug, Clone, Default, Serialize)]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl PageQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: Some(page),
            page_size: Some(page_size),
        }
    }
}
