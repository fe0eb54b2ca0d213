//! Database backup models

use chrono::NaiveDateTime;
use serde::Deserialize;

/// 备份文件（GET /api/backups/list/ 的 backups 数组元素）
///
/// 服务端给出的是无时区的本地时间戳
#[derive(Debug, Clone, Deserialize)]
pub struct BackupFile {
    pub filename: String,
    /// 字节数
    pub size: u64,
    pub created_at: NaiveDateTime,
    #[serde(default)]
    pub modified_at: Option<NaiveDateTime>,
}

/// 备份列表响应外层
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct BackupListResponse {
    #[serde(default)]
    pub backups: Vec<BackupFile>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backup_list_deserialization() {
        let json = r#"{"backups": [
            {"filename": "backup_2025-08-01.sql", "size": 104857,
             "created_at": "2025-08-01T03:00:00",
             "modified_at": "2025-08-01T03:00:05"}
        ]}"#;
        let list: BackupListResponse = serde_json::from_str(json).unwrap();
        assert_eq!(list.backups.len(), 1);
        assert_eq!(list.backups[0].filename, "backup_2025-08-01.sql");
        assert_eq!(list.backups[0].size, 104857);
    }

    #[test]
    fn test_empty_backup_list() {
        let list: BackupListResponse = serde_json::from_str(r#"{"backups": []}"#).unwrap();
        assert!(list.backups.is_empty());
    }
}
