// src/services/rbac_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::common::{
    error::AppError,
    pagination::{Page, PageRequest},
    permissions::{PERMISSIONS, SEED_ROLES},
};
use crate::db::RbacRepository;
use crate::models::{
    rbac::{group_permissions, Permission, PermissionGroup, Role, RolePayload, RoleQuery, RoleSummary},
    user::User,
};

#[derive(Clone)]
pub struct RbacService {
    repo: Arc<dyn RbacRepository>,
}

impl RbacService {
    pub fn new(repo: Arc<dyn RbacRepository>) -> Self {
        Self { repo }
    }

    pub async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        self.repo.list_permissions().await
    }

    pub async fn grouped_permissions(&self) -> Result<Vec<PermissionGroup>, AppError> {
        let permissions = self.repo.list_permissions().await?;
        Ok(group_permissions(permissions))
    }

    pub async fn search_roles(&self, query: RoleQuery) -> Result<Page<RoleSummary>, AppError> {
        let page = PageRequest::new(query.page);
        self.repo.search_roles(query.search.as_deref(), page).await
    }

    pub async fn get_role(&self, id: i64) -> Result<RoleSummary, AppError> {
        self.repo.find_role(id).await?.ok_or(AppError::RoleNotFound)
    }

    pub async fn create_role(&self, payload: RolePayload) -> Result<RoleSummary, AppError> {
        payload.validate()?;
        let role = self
            .repo
            .create_role(&payload.name, &payload.permission_names())
            .await?;
        tracing::info!(role_id = role.id, permissions = role.permissions_count, "Cargo criado");
        Ok(role)
    }

    pub async fn update_role(&self, id: i64, payload: RolePayload) -> Result<RoleSummary, AppError> {
        payload.validate()?;
        let role = self
            .repo
            .update_role(id, &payload.name, &payload.permission_names())
            .await?;
        tracing::info!(role_id = id, permissions = role.permissions_count, "Cargo atualizado");
        Ok(role)
    }

    pub async fn delete_role(&self, id: i64) -> Result<Role, AppError> {
        match self.repo.delete_role(id).await {
            Ok(role) => {
                tracing::info!(role_id = id, "Cargo excluído");
                Ok(role)
            }
            Err(e @ AppError::RoleInUse { .. }) => {
                tracing::warn!(role_id = id, "Exclusão recusada: {}", e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    pub async fn users_of(&self, role_id: i64) -> Result<Vec<User>, AppError> {
        // 404 em vez de lista vazia para cargo inexistente
        self.get_role(role_id).await?;
        self.repo.users_of_role(role_id).await
    }

    /// Semeia permissões e cargos padrão. Pode rodar quantas vezes quiser.
    pub async fn seed_defaults(&self) -> Result<(), AppError> {
        for name in PERMISSIONS {
            self.repo.ensure_permission(name).await?;
        }
        for seed in SEED_ROLES {
            self.repo.ensure_role(seed.name, &seed.permission_names()).await?;
        }
        tracing::info!(
            permissions = PERMISSIONS.len(),
            roles = SEED_ROLES.len(),
            "🌱 Permissões e cargos padrão garantidos"
        );
        Ok(())
    }
}
