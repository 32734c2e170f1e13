// src/models/rbac.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    permissions::{action_of, module_display, module_of, permission_display},
    validation::{empty_string_as_none, trimmed, validate_required_name},
};

// O que sai do banco (tabela roles)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    #[schema(example = 4)]
    pub id: i64,
    #[schema(example = "Supervisor")]
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O que sai do banco (tabela permissions)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "users.view")]
    pub name: String,
}

/// Cargo com as permissões e as contagens usadas na listagem.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoleSummary {
    #[schema(example = 4)]
    pub id: i64,
    #[schema(example = "Supervisor")]
    pub name: String,
    #[schema(example = json!(["analytics.view", "reports.view", "stores.view", "users.view"]))]
    pub permissions: Vec<String>,
    #[schema(example = 4)]
    pub permissions_count: i64,
    #[schema(example = 3)]
    pub users_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// O Payload para criar ou editar um cargo
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RolePayload {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_required_name"))]
    #[schema(example = "Auditor")]
    pub name: String,

    /// Nomes das permissões; a lista substitui a atual
    #[serde(default)]
    #[schema(example = json!(["logs.view", "logs.export"]))]
    pub permissions: Vec<String>,
}

impl RolePayload {
    /// Nomes sem repetição, na ordem em que chegaram.
    pub fn permission_names(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(self.permissions.len());
        for name in &self.permissions {
            let name = name.trim();
            if !name.is_empty() && !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        }
        names
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RoleQuery {
    /// Busca no nome do cargo
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    pub page: Option<i64>,
}

// ---
// Agrupamento por módulo (tela de atribuição de permissões)
// ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionEntry {
    pub id: i64,
    #[schema(example = "users.reset-password")]
    pub name: String,
    #[schema(example = "reset-password")]
    pub action: String,
    #[schema(example = "Resetear Contraseñas")]
    pub display: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PermissionGroup {
    #[schema(example = "users")]
    pub module: String,
    #[schema(example = "Gestión de Usuarios")]
    pub display: String,
    pub permissions: Vec<PermissionEntry>,
}

/// Agrupa pelo prefixo antes do primeiro "."; nomes sem ponto vão para
/// o módulo `general`. Módulos em ordem alfabética, permissões na ordem recebida.
pub fn group_permissions(permissions: Vec<Permission>) -> Vec<PermissionGroup> {
    let mut groups: BTreeMap<String, Vec<PermissionEntry>> = BTreeMap::new();
    for permission in permissions {
        let module = module_of(&permission.name).to_string();
        let entry = PermissionEntry {
            id: permission.id,
            action: action_of(&permission.name).to_string(),
            display: permission_display(&permission.name),
            name: permission.name,
        };
        groups.entry(module).or_default().push(entry);
    }

    groups
        .into_iter()
        .map(|(module, permissions)| PermissionGroup {
            display: module_display(&module),
            module,
            permissions,
        })
        .collect()
}
