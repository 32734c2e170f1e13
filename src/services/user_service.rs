// src/services/user_service.rs

use std::sync::Arc;

use crate::common::{error::AppError, pagination::Page, permissions::SUPER_ADMIN_ROLE};
use crate::config::AdminBootstrap;
use crate::db::UserRepository;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::{
    CreateUserPayload, NewUser, ResetPasswordPayload, UpdateUserPayload, User, UserChanges,
    UserProfile, UserQuery, UserView,
};
use crate::services::password::hash_password;

#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
    bcrypt_cost: u32,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepository>, bcrypt_cost: u32) -> Self {
        Self { repo, bcrypt_cost }
    }

    pub async fn search(&self, query: UserQuery) -> Result<Page<UserView>, AppError> {
        let (filter, page) = query.into_filter()?;
        let users = self.repo.search(&filter, page).await?;
        Ok(users.map(UserView::from))
    }

    pub async fn get(&self, id: i64) -> Result<UserView, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(UserView::from)
            .ok_or(AppError::UserNotFound)
    }

    pub async fn create(&self, payload: CreateUserPayload) -> Result<UserView, AppError> {
        payload.validate_all()?;

        // 1. Hashing fora de qualquer transação
        let password_hash = hash_password(&payload.password, self.bcrypt_cost).await?;

        let input = NewUser {
            name: payload.name,
            email: payload.email,
            password_hash,
            profile: payload.profile,
            role: payload.role,
            is_active: payload.is_active,
        };
        let user = self.repo.create(&input).await?;
        tracing::info!(user_id = user.user.id, role = ?user.role_name, "Usuário criado");
        Ok(user.into())
    }

    pub async fn update(&self, id: i64, payload: UpdateUserPayload) -> Result<UserView, AppError> {
        payload.validate_all()?;

        let password_hash = match payload.password.as_deref() {
            Some(password) => Some(hash_password(password, self.bcrypt_cost).await?),
            None => None,
        };

        let changes = UserChanges {
            name: payload.name,
            email: payload.email,
            password_hash,
            profile: payload.profile,
            role: payload.role,
            is_active: payload.is_active,
        };
        let user = self.repo.update(id, &changes).await?;
        tracing::info!(
            user_id = id,
            password_changed = changes.password_hash.is_some(),
            "Usuário atualizado"
        );
        Ok(user.into())
    }

    pub async fn delete(&self, actor: &AuthenticatedUser, id: i64) -> Result<User, AppError> {
        if actor.user.id == id {
            return Err(AppError::SelfModification);
        }
        let user = self.repo.delete(id).await?;
        tracing::info!(user_id = id, actor_id = actor.user.id, "Usuário excluído");
        Ok(user)
    }

    /// Inverte `is_active`. Ativar exige `users.activate`; desativar exige
    /// `users.deactivate` e não vale para a própria conta.
    pub async fn toggle_active(&self, actor: &AuthenticatedUser, id: i64) -> Result<UserView, AppError> {
        let current = self.repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)?;
        let activate = !current.user.is_active;

        let required = if activate { "users.activate" } else { "users.deactivate" };
        if !actor.can(required) {
            return Err(AppError::Forbidden(required.to_string()));
        }
        if !activate && actor.user.id == id {
            return Err(AppError::SelfModification);
        }

        let user = self.repo.set_active(id, activate).await?;
        tracing::info!(user_id = id, active = activate, actor_id = actor.user.id, "Status do usuário alterado");
        Ok(user.into())
    }

    /// Reset administrativo: não exige a senha anterior.
    pub async fn reset_password(&self, id: i64, payload: ResetPasswordPayload) -> Result<UserView, AppError> {
        payload.validate_all()?;
        let password_hash = hash_password(&payload.password, self.bcrypt_cost).await?;
        self.repo.set_password(id, &password_hash).await?;
        tracing::info!(user_id = id, "Senha redefinida");
        self.get(id).await
    }

    /// Cria a conta de administrador inicial, caso o e-mail ainda não exista.
    /// Retorna `true` quando a conta foi criada.
    pub async fn bootstrap_admin(&self, admin: &AdminBootstrap) -> Result<bool, AppError> {
        if self.repo.find_by_email(&admin.email).await?.is_some() {
            tracing::info!("Administrador inicial já existe; nada a fazer");
            return Ok(false);
        }

        let payload = CreateUserPayload {
            name: admin.name.trim().to_string(),
            email: admin.email.trim().to_string(),
            password: admin.password.clone(),
            password_confirmation: Some(admin.password.clone()),
            profile: UserProfile::default(),
            role: Some(SUPER_ADMIN_ROLE.to_string()),
            is_active: true,
        };
        let user = self.create(payload).await?;
        tracing::info!(user_id = user.detail.user.id, "👤 Administrador inicial criado");
        Ok(true)
    }
}
