use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

/// Роль пользователя панели (Administrador, Mecánico, Despachador...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
    #[serde(rename = "activo", default = "default_true")]
    pub active: bool,
}

/// Payload for POST /api/roles and PUT /api/roles/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleForm {
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "activo")]
    pub active: bool,
}

impl Default for RoleForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            active: true,
        }
    }
}

impl From<&Role> for RoleForm {
    fn from(role: &Role) -> Self {
        Self {
            name: role.name.clone(),
            description: role.description.clone(),
            active: role.active,
        }
    }
}
