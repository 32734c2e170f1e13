// src/models/zone.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::common::validation::{trimmed, validate_required_name};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    #[schema(example = 1)]
    pub id: i64,

    #[schema(example = "Norte")]
    pub name: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Criação e edição usam o mesmo formulário
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ZonePayload {
    #[serde(default, deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_required_name"))]
    #[schema(example = "Norte")]
    pub name: String,
}

impl ZonePayload {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into().trim().to_string() }
    }
}
