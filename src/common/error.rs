use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;
use validator::{ValidationError, ValidationErrors};

use crate::common::{i18n::I18nStore, validation::flatten_field_errors};
use crate::middleware::i18n::Locale;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] ValidationErrors),

    #[error("Zona não encontrada")]
    ZoneNotFound,

    #[error("Loja não encontrada")]
    StoreNotFound,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Cargo não encontrado")]
    RoleNotFound,

    #[error("Zona '{name}' em uso por {stores} loja(s)")]
    ZoneInUse { name: String, stores: i64 },

    #[error("Cargo '{name}' atribuído a {users} usuário(s)")]
    RoleInUse { name: String, users: i64 },

    #[error("Operação não permitida sobre a própria conta")]
    SelfModification,

    #[error("Status do usuário alterado por outra requisição")]
    StatusChanged,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Conta desativada")]
    InactiveAccount,

    #[error("Permissão necessária: {0}")]
    Forbidden(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

/// A taxonomia usada pela camada de apresentação.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    Unauthorized,
    Forbidden,
    Persistence,
}

impl AppError {
    /// Erro de validação de um único campo. `code` é a chave da mensagem no catálogo.
    pub fn field(field: &'static str, code: &'static str) -> Self {
        let mut err = ValidationError::new(code);
        err.message = Some(code.into());
        let mut errors = ValidationErrors::new();
        errors.add(field, err);
        AppError::ValidationError(errors)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::ValidationError(_) => ErrorKind::Validation,
            AppError::ZoneNotFound
            | AppError::StoreNotFound
            | AppError::UserNotFound
            | AppError::RoleNotFound => ErrorKind::NotFound,
            AppError::ZoneInUse { .. }
            | AppError::RoleInUse { .. }
            | AppError::SelfModification
            | AppError::StatusChanged => ErrorKind::Conflict,
            AppError::InvalidCredentials | AppError::InvalidToken => ErrorKind::Unauthorized,
            AppError::InactiveAccount | AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => ErrorKind::Persistence,
        }
    }

    /// Nomes dos campos com erro, útil para testes e logs.
    pub fn invalid_fields(&self) -> Vec<String> {
        match self {
            AppError::ValidationError(errors) => flatten_field_errors(errors).into_keys().collect(),
            _ => Vec::new(),
        }
    }

    /// Converte o erro em uma resposta traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let (status, key, args): (StatusCode, &str, Vec<(&str, String)>) = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in flatten_field_errors(errors) {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            let code = e.message.as_deref().unwrap_or(&e.code);
                            let params: Vec<(&str, String)> = e
                                .params
                                .iter()
                                .filter(|(k, _)| &**k != "value")
                                .map(|(k, v)| (&**k, json_to_text(v)))
                                .collect();
                            i18n.translate(lang, code, &params)
                        })
                        .collect();
                    details.insert(field, json!(messages));
                }
                return ApiError {
                    status: StatusCode::UNPROCESSABLE_ENTITY,
                    error: i18n.translate(lang, "validation_failed", &[]),
                    details: Some(Value::Object(details)),
                };
            }
            AppError::ZoneNotFound => (StatusCode::NOT_FOUND, "zone_not_found", vec![]),
            AppError::StoreNotFound => (StatusCode::NOT_FOUND, "store_not_found", vec![]),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "user_not_found", vec![]),
            AppError::RoleNotFound => (StatusCode::NOT_FOUND, "role_not_found", vec![]),
            AppError::ZoneInUse { name, stores } => (
                StatusCode::CONFLICT,
                "zone_in_use",
                vec![("name", name.clone()), ("count", stores.to_string())],
            ),
            AppError::RoleInUse { name, users } => (
                StatusCode::CONFLICT,
                "role_in_use",
                vec![("name", name.clone()), ("count", users.to_string())],
            ),
            AppError::SelfModification => (StatusCode::CONFLICT, "self_modification", vec![]),
            AppError::StatusChanged => (StatusCode::CONFLICT, "status_changed", vec![]),
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid_credentials", vec![])
            }
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", vec![]),
            AppError::InactiveAccount => (StatusCode::FORBIDDEN, "inactive_account", vec![]),
            AppError::Forbidden(permission) => (
                StatusCode::FORBIDDEN,
                "forbidden",
                vec![("permission", permission.clone())],
            ),

            // Todos os outros erros viram 500. O `tracing` loga a mensagem detalhada.
            e => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", vec![])
            }
        };

        ApiError {
            status,
            error: i18n.translate(lang, key, &args),
            details: None,
        }
    }
}

fn json_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

// Resposta de erro já traduzida
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

// Fallback para quando não há idioma disponível (ex: dentro de middlewares genéricos)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default(), &I18nStore::default())
            .into_response()
    }
}
