//! Maintenance record models

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// 维护类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceType {
    /// 计算机设备预防性维护
    Computer,
    /// 打印机/扫描仪预防性维护
    PrinterScanner,
}

impl Default for MaintenanceType {
    fn default() -> Self {
        Self::Computer
    }
}

/// 维护记录
#[derive(Debug, Clone, Deserialize)]
pub struct Maintenance {
    pub id: i64,
    /// 关联设备 id
    pub equipment: i64,
    #[serde(default)]
    pub maintenance_type: MaintenanceType,
    pub description: String,
    pub maintenance_date: NaiveDate,
    pub performed_by: String,
    #[serde(default)]
    pub sede: Option<String>,
    #[serde(default)]
    pub dependencia: Option<String>,
    #[serde(default)]
    pub oficina: Option<String>,
    #[serde(default)]
    pub placa: Option<String>,
    #[serde(default)]
    pub hora_inicio: Option<NaiveTime>,
    #[serde(default)]
    pub hora_final: Option<NaiveTime>,
    /// 检查单活动，自由结构，由服务端原样保存
    #[serde(default)]
    pub activities: serde_json::Value,
    #[serde(default)]
    pub observaciones_generales: Option<String>,
    #[serde(default)]
    pub observaciones_seguridad: Option<String>,
    #[serde(default)]
    pub calificacion_servicio: Option<String>,
    #[serde(default)]
    pub observaciones_usuario: Option<String>,
    #[serde(default)]
    pub is_incident: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub photos: Vec<Photo>,
}

/// 维护记录创建/更新载荷
#[derive(Debug, Clone, Serialize, Validate)]
pub struct MaintenancePayload {
    pub equipment: i64,
    pub maintenance_type: MaintenanceType,
    #[validate(length(min = 1, message = "description must not be empty"))]
    pub description: String,
    pub maintenance_date: NaiveDate,
    #[validate(length(min = 1, message = "performed_by must not be empty"))]
    pub performed_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sede: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependencia: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oficina: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placa: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hora_inicio: Option<NaiveTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hora_final: Option<NaiveTime>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub activities: serde_json::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones_generales: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones_seguridad: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calificacion_servicio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observaciones_usuario: Option<String>,
    pub is_incident: bool,
}

impl MaintenancePayload {
    /// 最小载荷，其余字段按需填充
    pub fn new(
        equipment: i64,
        maintenance_type: MaintenanceType,
        description: impl Into<String>,
        maintenance_date: NaiveDate,
        performed_by: impl Into<String>,
    ) -> Self {
        Self {
            equipment,
            maintenance_type,
            description: description.into(),
            maintenance_date,
            performed_by: performed_by.into(),
            sede: None,
            dependencia: None,
            oficina: None,
            placa: None,
            hora_inicio: None,
            hora_final: None,
            activities: serde_json::Value::Null,
            observaciones_generales: None,
            observaciones_seguridad: None,
            calificacion_servicio: None,
            observaciones_usuario: None,
            is_incident: false,
        }
    }
}

/// 维护照片
#[derive(Debug, Clone, Deserialize)]
pub struct Photo {
    pub id: i64,
    pub maintenance: i64,
    /// 服务端存储的图片地址
    pub image: String,
    #[serde(default)]
    pub thumbnail: Option<String>,
    pub uploaded_at: DateTime<Utc>,
}
