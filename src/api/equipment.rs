//! Equipment registry endpoints

use super::ApiClient;
use crate::error::Result;
use crate::models::equipment::{Equipment, EquipmentPayload};
use crate::models::{Page, PageQuery};
use validator::Validate;

impl ApiClient {
    /// 设备分页列表
    pub async fn list_equipments(&self, query: &PageQuery) -> Result<Page<Equipment>> {
        self.get_json_query("api/equipments/", query).await
    }

    pub async fn get_equipment(&self, id: i64) -> Result<Equipment> {
        self.get_json(&format!("api/equipments/{id}/")).await
    }

    pub async fn create_equipment(&self, payload: &EquipmentPayload) -> Result<Equipment> {
        payload.validate()?;
        self.post_json("api/equipments/", payload).await
    }

    pub async fn update_equipment(&self, id: i64, payload: &EquipmentPayload) -> Result<Equipment> {
        payload.validate()?;
        self.put_json(&format!("api/equipments/{id}/"), payload).await
    }

    pub async fn delete_equipment(&self, id: i64) -> Result<()> {
        self.delete(&format!("api/equipments/{id}/")).await
    }
}
