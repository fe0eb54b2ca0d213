//! Maintenance record endpoints

use super::ApiClient;
use crate::error::Result;
use crate::models::maintenance::{Maintenance, MaintenancePayload, Photo};
use crate::models::{Page, PageQuery};
use validator::Validate;

impl ApiClient {
    /// 维护记录分页列表
    pub async fn list_maintenances(&self, query: &PageQuery) -> Result<Page<Maintenance>> {
        self.get_json_query("api/maintenances/", query).await
    }

    pub async fn get_maintenance(&self, id: i64) -> Result<Maintenance> {
        self.get_json(&format!("api/maintenances/{id}/")).await
    }

    pub async fn create_maintenance(&self, payload: &MaintenancePayload) -> Result<Maintenance> {
        payload.validate()?;
        self.post_json("api/maintenances/", payload).await
    }

    pub async fn update_maintenance(
        &self,
        id: i64,
        payload: &MaintenancePayload,
    ) -> Result<Maintenance> {
        payload.validate()?;
        self.put_json(&format!("api/maintenances/{id}/"), payload)
            .await
    }

    pub async fn delete_maintenance(&self, id: i64) -> Result<()> {
        self.delete(&format!("api/maintenances/{id}/")).await
    }

    /// 某条维护记录的照片
    pub async fn list_maintenance_photos(&self, id: i64) -> Result<Vec<Photo>> {
        self.get_json(&format!("api/maintenances/{id}/photos/"))
            .await
    }

    /// 上传维护照片（multipart，字段名 `image`）
    pub async fn upload_maintenance_photo(
        &self,
        id: i64,
        file_name: &str,
        content: Vec<u8>,
        mime_type: &str,
    ) -> Result<Photo> {
        let path = format!("api/maintenances/{id}/upload_photo/");
        let file_name = file_name.to_string();
        let mime_type = mime_type.to_string();

        self.post_multipart(&path, move || {
            let part = reqwest::multipart::Part::bytes(content.clone())
                .file_name(file_name.clone())
                .mime_str(&mime_type)
                .map_err(crate::error::ClientError::Transport)?;
            Ok(reqwest::multipart::Form::new().part("image", part))
        })
        .await
    }
}
