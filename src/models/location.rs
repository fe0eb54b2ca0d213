//! 位置层级模型
//! 三级层级：sede（驻地）→ dependencia（部门）→ subdependencia（科室），级联选择的数据来源

use serde::{Deserialize, Serialize};
use validator::Validate;

/// 驻地（层级根）
#[derive(Debug, Clone, Deserialize)]
pub struct Sede {
    pub id: i64,
    pub nombre: String,
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

/// 部门，挂在某个驻地下
#[derive(Debug, Clone, Deserialize)]
pub struct Dependencia {
    pub id: i64,
    pub nombre: String,
    /// 所属驻地 id
    pub sede: i64,
    #[serde(default)]
    pub sede_nombre: String,
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

/// 科室，挂在某个部门下
#[derive(Debug, Clone, Deserialize)]
pub struct Subdependencia {
    pub id: i64,
    pub nombre: String,
    /// 所属部门 id
    pub dependencia: i64,
    #[serde(default)]
    pub dependencia_nombre: String,
    #[serde(default)]
    pub sede_nombre: String,
    #[serde(default)]
    pub codigo: Option<String>,
    #[serde(default = "default_activo")]
    pub activo: bool,
}

fn default_activo() -> bool {
    true
}

/// 层级节点创建/更新载荷（三级通用；parent 字段名由调用方法决定）
#[derive(Debug, Clone, Serialize, Validate)]
pub struct LocationPayload {
    #[validate(length(min = 1, max = 100, message = "nombre must be 1-100 characters"))]
    pub nombre: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub codigo: Option<String>,
    pub activo: bool,
    /// 上级节点 id：dependencia 的 sede / subdependencia 的 dependencia
    #[serde(flatten)]
    pub parent: Option<LocationParent>,
}

/// 上级节点引用
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LocationParent {
    Sede { sede: i64 },
    Dependencia { dependencia: i64 },
}

impl LocationPayload {
    pub fn root(nombre: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
            codigo: None,
            activo: true,
            parent: None,
        }
    }

    pub fn under_sede(nombre: impl Into<String>, sede: i64) -> Self {
        Self {
            parent: Some(LocationParent::Sede { sede }),
            ..Self::root(nombre)
        }
    }

    pub fn under_dependencia(nombre: impl Into<String>, dependencia: i64) -> Self {
        Self {
            parent: Some(LocationParent::Dependencia { dependencia }),
            ..Self::root(nombre)
        }
    }
}
