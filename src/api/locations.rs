//! 位置层级端点
//! 级联选择的数据来源：sede → dependencia → subdependencia

use super::ApiClient;
use crate::error::Result;
use crate::models::location::{Dependencia, LocationPayload, Sede, Subdependencia};
use crate::models::Page;
use validator::Validate;

impl ApiClient {
    /// 全部驻地（默认只取启用的，级联选择的第一级）
    pub async fn list_sedes(&self, only_active: bool) -> Result<Page<Sede>> {
        if only_active {
            self.get_json_query("api/config/sedes/", &[("activo", "true")])
                .await
        } else {
            self.get_json("api/config/sedes/").await
        }
    }

    pub async fn create_sede(&self, payload: &LocationPayload) -> Result<Sede> {
        payload.validate()?;
        self.post_json("api/config/sedes/", payload).await
    }

    pub async fn update_sede(&self, id: i64, payload: &LocationPayload) -> Result<Sede> {
        payload.validate()?;
        self.put_json(&format!("api/config/sedes/{id}/"), payload)
            .await
    }

    pub async fn delete_sede(&self, id: i64) -> Result<()> {
        self.delete(&format!("api/config/sedes/{id}/")).await
    }

    /// 某驻地下启用的部门（级联第二级）
    pub async fn list_dependencias_by_sede(&self, sede_id: i64) -> Result<Vec<Dependencia>> {
        self.get_json_query(
            "api/config/dependencias/por_sede/",
            &[("sede_id", sede_id.to_string())],
        )
        .await
    }

    pub async fn create_dependencia(&self, payload: &LocationPayload) -> Result<Dependencia> {
        payload.validate()?;
        self.post_json("api/config/dependencias/", payload).await
    }

    pub async fn update_dependencia(&self, id: i64, payload: &LocationPayload) -> Result<Dependencia> {
        payload.validate()?;
        self.put_json(&format!("api/config/dependencias/{id}/"), payload)
            .await
    }

    pub async fn delete_dependencia(&self, id: i64) -> Result<()> {
        self.delete(&format!("api/config/dependencias/{id}/")).await
    }

    /// 某部门下启用的科室（级联第三级）
    pub async fn list_subdependencias_by_dependencia(
        &self,
        dependencia_id: i64,
    ) -> Result<Vec<Subdependencia>> {
        self.get_json_query(
            "api/config/subdependencias/por_dependencia/",
            &[("dependencia_id", dependencia_id.to_string())],
        )
        .await
    }

    pub async fn create_subdependencia(&self, payload: &LocationPayload) -> Result<Subdependencia> {
        payload.validate()?;
        self.post_json("api/config/subdependencias/", payload).await
    }

    pub async fn delete_subdependencia(&self, id: i64) -> Result<()> {
        self.delete(&format!("api/config/subdependencias/{id}/"))
            .await
    }
}
