//! Report generation and download endpoints

use super::ApiClient;
use crate::error::Result;
use crate::models::report::{GenerateReportRequest, ReportEntry, ReportFormat};
use crate::models::{Page, PageQuery};

impl ApiClient {
    /// 生成报表并返回文件内容（PDF/Excel/图片由 `format` 决定）
    pub async fn generate_report(
        &self,
        maintenance_id: i64,
        format: ReportFormat,
    ) -> Result<Vec<u8>> {
        let request = GenerateReportRequest {
            maintenance_id,
            format,
        };
        self.post_json_bytes("api/reports/generate/", &request).await
    }

    /// 已生成报表列表
    pub async fn list_reports(&self, query: &PageQuery) -> Result<Page<ReportEntry>> {
        self.get_json_query("api/reports/", query).await
    }

    /// 下载某条维护记录已生成的报表
    pub async fn download_maintenance_report(&self, maintenance_id: i64) -> Result<Vec<u8>> {
        self.get_bytes(&format!("api/reports/maintenance/{maintenance_id}/download/"))
            .await
    }
}
