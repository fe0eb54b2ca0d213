//! 数据库备份端点（仅管理员）

use super::ApiClient;
use crate::error::Result;
use crate::models::backup::{BackupFile, BackupListResponse};
use serde_json::Value;

impl ApiClient {
    /// 触发一次新备份
    pub async fn create_backup(&self) -> Result<Value> {
        self.post_empty("api/backups/create/").await
    }

    /// 备份文件列表（新的在前）
    pub async fn list_backups(&self) -> Result<Vec<BackupFile>> {
        let response: BackupListResponse = self.get_json("api/backups/list/").await?;
        Ok(response.backups)
    }

    /// 下载备份文件
    pub async fn download_backup(&self, filename: &str) -> Result<Vec<u8>> {
        self.get_bytes(&format!("api/backups/download/{filename}/"))
            .await
    }

    /// 用指定备份恢复数据库
    pub async fn restore_backup(&self, filename: &str) -> Result<Value> {
        self.post_empty(&format!("api/backups/restore/{filename}/"))
            .await
    }

    /// 删除备份文件
    pub async fn delete_backup(&self, filename: &str) -> Result<()> {
        self.delete(&format!("api/backups/delete/{filename}/")).await
    }
}
