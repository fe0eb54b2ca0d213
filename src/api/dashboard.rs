//! Dashboard statistics endpoints

use super::ApiClient;
use crate::error::Result;
use crate::models::dashboard::{DashboardStats, MaintenanceTimelinePoint};
use serde_json::Value;

impl ApiClient {
    /// 汇总统计
    pub async fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.get_json("api/dashboard/").await
    }

    /// 设备维度统计（图表数据，结构由服务端决定）
    pub async fn dashboard_equipment_stats(&self) -> Result<Value> {
        self.get_json("api/dashboard/equipment/").await
    }

    /// 近 12 个月维护时间线
    pub async fn dashboard_timeline(&self) -> Result<Vec<MaintenanceTimelinePoint>> {
        self.get_json("api/dashboard/timeline/").await
    }
}
