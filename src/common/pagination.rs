// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Todas as listagens paginadas usam 10 registros por página.
pub const PAGE_SIZE: i64 = 10;

/// Maior página cujo offset ainda cabe em um i64.
pub const MAX_PAGE: i64 = i64::MAX / PAGE_SIZE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageRequest {
    pub page: i64,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1 }
    }
}

impl PageRequest {
    /// Páginas começam em 1; valores ausentes ou menores viram 1 e valores
    /// absurdos param em `MAX_PAGE`.
    pub fn new(page: Option<i64>) -> Self {
        Self { page: page.unwrap_or(1).clamp(1, MAX_PAGE) }
    }

    pub fn limit(&self) -> i64 {
        PAGE_SIZE
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(PAGE_SIZE)
    }
}

/// Uma página de resultados com os metadados para montar a paginação.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    #[schema(example = 42)]
    pub total: i64,
    #[schema(example = 1)]
    pub page: i64,
    #[schema(example = 10)]
    pub per_page: i64,
    #[schema(example = 5)]
    pub last_page: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        let last_page = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
        Self {
            items,
            total,
            page: request.page,
            per_page: PAGE_SIZE,
            last_page,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
            last_page: self.last_page,
        }
    }
}
