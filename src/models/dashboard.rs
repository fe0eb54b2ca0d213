//! Dashboard statistics models

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// 仪表盘汇总统计（GET /api/dashboard/）
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardStats {
    #[serde(default)]
    pub total_maintenances: u64,
    #[serde(default)]
    pub total_equipment: u64,
    #[serde(default)]
    pub total_reports: u64,
    #[serde(default)]
    pub by_type: Vec<TypeCount>,
    #[serde(default)]
    pub by_dependency: Vec<serde_json::Value>,
    #[serde(default)]
    pub by_month: Vec<serde_json::Value>,
}

/// 按维护类型统计
#[derive(Debug, Clone, Deserialize)]
pub struct TypeCount {
    pub maintenance_type: String,
    pub total: u64,
}

/// 维护时间线数据点（GET /api/dashboard/timeline/）
#[derive(Debug, Clone, Deserialize)]
pub struct MaintenanceTimelinePoint {
    pub id: i64,
    #[serde(default)]
    pub equipment_name: String,
    pub maintenance_date: chrono::NaiveDate,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
