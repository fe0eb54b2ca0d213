//! Report generation models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 报表输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Pdf,
    Excel,
    Image,
}

impl ReportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Excel => "excel",
            ReportFormat::Image => "image",
        }
    }

    /// 下载文件的扩展名
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Pdf => "pdf",
            ReportFormat::Excel => "xlsx",
            ReportFormat::Image => "png",
        }
    }
}

/// 报表生成请求（POST /api/reports/generate/）
#[derive(Debug, Serialize)]
pub struct GenerateReportRequest {
    pub maintenance_id: i64,
    pub format: ReportFormat,
}

/// 已生成报表条目（GET /api/reports/）
#[derive(Debug, Clone, Deserialize)]
pub struct ReportEntry {
    pub id: i64,
    #[serde(default)]
    pub maintenance: Option<i64>,
    #[serde(default)]
    pub generated_by: Option<i64>,
    #[serde(default)]
    pub report_data: serde_json::Value,
    #[serde(default)]
    pub pdf_file: Option<String>,
    #[serde(default)]
    pub file_url: Option<String>,
    pub generated_at: DateTime<Utc>,
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub file_size: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_serialization() {
        assert_eq!(serde_json::to_string(&ReportFormat::Pdf).unwrap(), "\"pdf\"");
        assert_eq!(
            serde_json::to_string(&ReportFormat::Excel).unwrap(),
            "\"excel\""
        );
        assert_eq!(ReportFormat::Excel.extension(), "xlsx");
    }

    #[test]
    fn test_generate_request_shape() {
        let req = GenerateReportRequest {
            maintenance_id: 12,
            format: ReportFormat::Pdf,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert_eq!(json, r#"{"maintenance_id":12,"format":"pdf"}"#);
    }

    #[test]
    fn test_report_entry_deserialization() {
        let json = r#"{
            "id": 3, "maintenance": 12, "generated_by": 1,
            "report_data": {}, "pdf_file": "maintenance_reports/r3.pdf",
            "file_url": "http://localhost:8000/media/maintenance_reports/r3.pdf",
            "generated_at": "2025-07-01T10:00:00Z",
            "expires_at": null, "file_size": 52341
        }"#;
        let entry: ReportEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.maintenance, Some(12));
        assert_eq!(entry.file_size, 52341);
        assert!(entry.expires_at.is_none());
    }
}
