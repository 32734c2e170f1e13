// src/models/auth.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::common::{
    error::AppError,
    validation::{self, trimmed},
};
use crate::models::user::UserView;

// Dados para login
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(email(message = "invalid_email"))]
    #[schema(example = "admin@example.com")]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, message = "required"))]
    #[schema(example = "abcdefgh")]
    pub password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    #[schema(example = "Bearer")]
    pub token_type: String,
    #[schema(example = 604800)]
    pub expires_in: i64,
    pub user: UserView,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: i64,   // Subject (ID do usuário)
    pub exp: usize, // Expiration time
    pub iat: usize, // Issued At
}

/// Usuário logado, com cargo e permissões efetivas.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user: UserView,
    #[schema(example = "Supervisor")]
    pub role: Option<String>,
    #[schema(example = json!(["users.view", "stores.view"]))]
    pub permissions: Vec<String>,
}

// Troca de senha pelo próprio usuário
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordPayload {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: Option<String>,
}

impl ChangePasswordPayload {
    pub fn validate_all(&self) -> Result<(), AppError> {
        let mut errors = validator::ValidationErrors::new();
        if self.current_password.is_empty() {
            let mut err = validator::ValidationError::new("required");
            err.message = Some("required".into());
            errors.add("current_password", err);
        }
        validation::check_password_pair(
            &mut errors,
            "password",
            &self.password,
            self.password_confirmation.as_deref(),
        );
        Ok(validation::finish(errors)?)
    }
}
