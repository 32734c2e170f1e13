// src/services/auth.rs

use std::{collections::HashSet, sync::Arc};

use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::SecuritySettings,
    db::{RbacRepository, UserRepository},
    middleware::auth::AuthenticatedUser,
    models::{
        auth::{AuthResponse, ChangePasswordPayload, Claims, LoginPayload, MeResponse},
        user::UserView,
    },
    services::password::{hash_password, verify_password},
};

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    rbac: Arc<dyn RbacRepository>,
    security: SecuritySettings,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, rbac: Arc<dyn RbacRepository>, security: SecuritySettings) -> Self {
        Self { users, rbac, security }
    }

    pub async fn login(&self, payload: LoginPayload) -> Result<AuthResponse, AppError> {
        payload.validate()?;

        let user = self
            .users
            .find_by_email(&payload.email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        // Executa a verificação em um thread separado
        if !verify_password(&payload.password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }
        if !user.is_active {
            tracing::warn!(user_id = user.id, "Login recusado: conta desativada");
            return Err(AppError::InactiveAccount);
        }

        self.users.record_login(user.id).await?;
        let token = self.create_token(user.id)?;
        let detail = self.users.find_by_id(user.id).await?.ok_or(AppError::UserNotFound)?;

        tracing::info!(user_id = user.id, "Login realizado");
        Ok(AuthResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in: self.security.jwt_ttl.num_seconds(),
            user: detail.into(),
        })
    }

    /// Valida o token e carrega o usuário com as permissões efetivas.
    pub async fn authenticate(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.security.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        let detail = self
            .users
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        if !detail.user.is_active {
            return Err(AppError::InactiveAccount);
        }

        let permissions: HashSet<String> = self
            .rbac
            .user_permissions(detail.user.id)
            .await?
            .into_iter()
            .collect();

        Ok(AuthenticatedUser {
            role: detail.role_name.clone(),
            user: detail.user,
            permissions,
        })
    }

    pub async fn me(&self, actor: &AuthenticatedUser) -> Result<MeResponse, AppError> {
        let detail = self
            .users
            .find_by_id(actor.user.id)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let mut permissions: Vec<String> = actor.permissions.iter().cloned().collect();
        permissions.sort();

        Ok(MeResponse {
            role: detail.role_name.clone(),
            user: UserView::from(detail),
            permissions,
        })
    }

    /// Troca de senha pelo próprio usuário; exige a senha atual.
    pub async fn change_password(&self, actor: &AuthenticatedUser, payload: ChangePasswordPayload) -> Result<(), AppError> {
        payload.validate_all()?;

        if !verify_password(&payload.current_password, &actor.user.password_hash).await? {
            return Err(AppError::field("current_password", "password_incorrect"));
        }

        let password_hash = hash_password(&payload.password, self.security.bcrypt_cost).await?;
        self.users.set_password(actor.user.id, &password_hash).await?;
        tracing::info!(user_id = actor.user.id, "Senha alterada pelo próprio usuário");
        Ok(())
    }

    pub fn create_token(&self, user_id: i64) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + self.security.jwt_ttl;

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.security.jwt_secret.as_ref()),
        )?)
    }
}
