// src/models/store.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::common::{
    countries,
    error::AppError,
    formatting::full_address,
    pagination::PageRequest,
    validation::{empty_string_as_none, trimmed, validate_required_name},
};

// O que sai do banco (tabela stores)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "OF-001")]
    pub office_number: Option<String>,
    #[schema(example = "Tienda Centro")]
    pub name: String,
    pub supervisor: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    #[schema(example = "MEX")]
    pub country: String,
    #[schema(example = 1)]
    pub zone_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Loja com o nome da zona (JOIN com zones).
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreDetail {
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub store: Store,
    #[schema(example = "Norte")]
    pub zone_name: String,
}

/// Representação exibida pela API, com os campos derivados.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StoreView {
    #[serde(flatten)]
    pub detail: StoreDetail,
    #[schema(example = "México")]
    pub country_name: String,
    #[schema(example = "Av. Reforma 100, CDMX, México")]
    pub full_address: String,
}

impl From<StoreDetail> for StoreView {
    fn from(detail: StoreDetail) -> Self {
        let store = &detail.store;
        // Código desconhecido aparece como está
        let country_name = countries::name(&store.country)
            .unwrap_or(store.country.as_str())
            .to_string();
        let full_address = full_address([
            store.address.as_deref(),
            store.address_2.as_deref(),
            store.city.as_deref(),
            store.state.as_deref(),
            store.postal_code.as_deref(),
            Some(country_name.as_str()),
        ]);
        Self { detail, country_name, full_address }
    }
}

fn validate_store_country(code: &str) -> Result<(), ValidationError> {
    if code.is_empty() {
        let mut err = ValidationError::new("required");
        err.message = Some("required".into());
        return Err(err);
    }
    countries::validate_country_code(code)
}

// ---
// Payload: criação e edição de loja
// ---
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StorePayload {
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub office_number: Option<String>,

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_required_name"))]
    #[schema(example = "Tienda Centro")]
    pub name: String,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub supervisor: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(email(message = "invalid_email"), length(max = 255, message = "length"))]
    pub email: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub phone: Option<String>,

    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[validate(length(max = 255, message = "length"))]
    pub mobile: Option<String>,

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

    #[serde(default, deserialize_with = "trimmed")]
    #[validate(custom(function = "validate_store_country"))]
    #[schema(example = "MEX")]
    pub country: String,

    #[validate(required(message = "required"))]
    #[schema(example = 1)]
    pub zone_id: Option<i64>,
}

/// Dados de loja já validados, prontos para o repositório.
#[derive(Debug, Clone)]
pub struct StoreInput {
    pub office_number: Option<String>,
    pub name: String,
    pub supervisor: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub mobile: Option<String>,
    pub address: Option<String>,
    pub address_2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub country: String,
    pub zone_id: i64,
}

impl StorePayload {
    pub fn into_input(self) -> Result<StoreInput, AppError> {
        self.validate()?;
        let zone_id = self.zone_id.ok_or_else(|| AppError::field("zone_id", "required"))?;
        Ok(StoreInput {
            office_number: self.office_number,
            name: self.name,
            supervisor: self.supervisor,
            email: self.email,
            phone: self.phone,
            mobile: self.mobile,
            address: self.address,
            address_2: self.address_2,
            city: self.city,
            state: self.state,
            postal_code: self.postal_code,
            country: self.country,
            zone_id,
        })
    }
}

// ---
// Busca, filtros e ordenação
// ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StoreSortColumn {
    #[default]
    Name,
    OfficeNumber,
    City,
    Country,
    CreatedAt,
}

impl StoreSortColumn {
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "name" => Some(Self::Name),
            "office_number" => Some(Self::OfficeNumber),
            "city" => Some(Self::City),
            "country" => Some(Self::Country),
            "created_at" => Some(Self::CreatedAt),
            _ => None,
        }
    }

    /// Coluna SQL correspondente. Só valores desta lista chegam à query.
    pub fn column(self) -> &'static str {
        match self {
            Self::Name => "s.name",
            Self::OfficeNumber => "s.office_number",
            Self::City => "s.city",
            Self::Country => "s.country",
            Self::CreatedAt => "s.created_at",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn from_param(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "asc" => Some(Self::Asc),
            "desc" => Some(Self::Desc),
            _ => None,
        }
    }

    pub fn keyword(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct StoreQuery {
    /// Busca em nome, supervisor, e-mail, cidade, endereço e número de oficina
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub country: Option<String>,
    pub zone_id: Option<i64>,
    /// name | office_number | city | country | created_at
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub sort: Option<String>,
    /// asc | desc
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub direction: Option<String>,
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreFilter {
    pub search: Option<String>,
    pub country: Option<String>,
    pub zone_id: Option<i64>,
    pub sort: StoreSortColumn,
    pub direction: SortDirection,
}

impl StoreQuery {
    pub fn into_filter(self) -> Result<(StoreFilter, PageRequest), AppError> {
        let sort = match self.sort.as_deref() {
            None => StoreSortColumn::default(),
            Some(value) => StoreSortColumn::from_param(value)
                .ok_or_else(|| AppError::field("sort", "invalid_sort"))?,
        };
        let direction = match self.direction.as_deref() {
            None => SortDirection::default(),
            Some(value) => SortDirection::from_param(value)
                .ok_or_else(|| AppError::field("direction", "invalid_sort"))?,
        };
        let filter = StoreFilter {
            search: self.search,
            country: self.country,
            zone_id: self.zone_id,
            sort,
            direction,
        };
        Ok((filter, PageRequest::new(self.page)))
    }
}
