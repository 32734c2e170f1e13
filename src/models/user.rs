// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::common::{
    countries,
    error::AppError,
    formatting::{formatted_id, full_address, initials},
    pagination::PageRequest,
    validation::{self, empty_string_as_none, trimmed, validate_required_email, validate_required_name},
};

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "Ana Lopez")]
    pub name: String,
    #[schema(example = "ana@example.com")]
    pub email: String,

    #[serde(skip_serializing)]
    #[schema(ignore)]
    pub password_hash: String,

    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub store_id: Option<i64>,
    pub address: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub is_active: bool,
    pub last_login_at: Option<DateTime<Utc>>,
    pub email_verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Usuário com o nome do cargo e da loja (JOINs).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub user: User,
    #[schema(example = "Supervisor")]
    pub role_name: Option<String>,
    #[schema(example = "Tienda Centro")]
    pub store_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    #[serde(flatten)]
    pub detail: UserDetail,
    #[schema(example = "000001")]
    pub formatted_id: String,
    #[schema(example = "AL")]
    pub initials: String,
    pub country_name: Option<String>,
    pub full_address: String,
}

impl From<UserDetail> for UserView {
    fn from(detail: UserDetail) -> Self {
        let user = &detail.user;
        let country_name = user
            .country
            .as_deref()
            .and_then(countries::name)
            .map(str::to_string);
        let full_address = full_address([
            user.address.as_deref(),
            user.address_2.as_deref(),
            user.city.as_deref(),
            user.state.as_deref(),
            user.postal_code.as_deref(),
            country_name.as_deref(),
        ]);
        Self {
            formatted_id: formatted_id(user.id),
            initials: initials(&user.name),
            country_name,
            full_address,
            detail,
        }
    }
}

fn validate_optional_country(code: &str) -> Result<(), validator::ValidationError> {
    countries::validate_country_code(code)
}

// ---
// Payloads
// ---

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserPayload {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_required_name"))]
    #[schema(example = "Ana Lopez")]
    pub name: String,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_required_email"))]
    #[schema(example = "ana@example.com")]
    pub email: String,

    #[serde(default)]
    #[schema(example = "abcdefgh")]
    pub password: String,

    #[serde(default)]
    #[schema(example = "abcdefgh")]
    pub password_confirmation: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub profile: UserProfile,

    /// Nome do cargo. Ausente = sem cargo.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[schema(example = "Supervisor")]
    pub role: Option<String>,

    /// Ausente = ativo
    #[serde(default = "default_active")]
    #[schema(example = true)]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl Default for CreateUserPayload {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            password_confirmation: None,
            profile: UserProfile::default(),
            role: None,
            is_active: default_active(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserPayload {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_required_name"))]
    pub name: String,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_required_email"))]
    pub email: String,

    /// Vazio ou ausente mantém a senha atual
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub password: Option<String>,

    #[serde(default)]
    pub password_confirmation: Option<String>,

    #[serde(flatten)]
    #[validate(nested)]
    pub profile: UserProfile,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub role: Option<String>,

    /// Ausente mantém o estado atual
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Campos de contato e endereço, comuns ao cadastro e à edição.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub mobile: Option<String>,

    #[serde(default)]
    pub store_id: Option<i64>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub address: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub address_2: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub city: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub state: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub postal_code: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(custom(function = "validate_optional_country"))]
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: Option<String>,
}

/// Usuário novo já validado; a senha chega aqui apenas como hash.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub profile: UserProfile,
    pub role: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone)]
pub struct UserChanges {
    pub name: String,
    pub email: String,
    /// `None` mantém o hash atual
    pub password_hash: Option<String>,
    pub profile: UserProfile,
    pub role: Option<String>,
    /// `None` mantém o estado atual
    pub is_active: Option<bool>,
}

impl CreateUserPayload {
    /// Validação completa: campos derivados mais o par senha/confirmação.
    pub fn validate_all(&self) -> Result<(), AppError> {
        let mut errors = validation::collect(self.validate());
        validation::check_password_pair(
            &mut errors,
            "password",
            &self.password,
            self.password_confirmation.as_deref(),
        );
        Ok(validation::finish(errors)?)
    }
}

impl UpdateUserPayload {
    pub fn validate_all(&self) -> Result<(), AppError> {
        let mut errors = validation::collect(self.validate());
        if let Some(password) = self.password.as_deref() {
            validation::check_password_pair(
                &mut errors,
                "password",
                password,
                self.password_confirmation.as_deref(),
            );
        }
        Ok(validation::finish(errors)?)
    }
}

impl ResetPasswordPayload {
    pub fn validate_all(&self) -> Result<(), AppError> {
        let mut errors = validator::ValidationErrors::new();
        validation::check_password_pair(
            &mut errors,
            "password",
            &self.password,
            self.password_confirmation.as_deref(),
        );
        Ok(validation::finish(errors)?)
    }
}

// ---
// Busca
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserStatus {
    #[default]
    All,
    Active,
    Inactive,
}

impl UserStatus {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "active" => Some(Self::Active),
            "inactive" => Some(Self::Inactive),
            _ => None,
        }
    }

    /// Valor de `is_active` exigido pelo filtro, se houver.
    pub fn is_active(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Active => Some(true),
            Self::Inactive => Some(false),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    /// Busca em nome e e-mail
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    /// all | active | inactive
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub status: Option<String>,
    /// Nome do cargo
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub role: Option<String>,
    pub store_id: Option<i64>,
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub search: Option<String>,
    pub status: UserStatus,
    pub role: Option<String>,
    pub store_id: Option<i64>,
}

impl UserQuery {
    pub fn into_filter(self) -> Result<(UserFilter, PageRequest), AppError> {
        let status = match self.status.as_deref() {
            None => UserStatus::All,
            Some(value) => UserStatus::from_param(value)
                .ok_or_else(|| AppError::field("status", "invalid_status"))?,
        };
        let filter = UserFilter {
            search: self.search,
            status,
            role: self.role,
            store_id: self.store_id,
        };
        Ok((filter, PageRequest::new(self.page)))
    }
}
