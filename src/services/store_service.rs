// src/services/store_service.rs

use std::sync::Arc;

use crate::common::{error::AppError, pagination::Page};
use crate::db::StoreRepository;
use crate::models::store::{Store, StorePayload, StoreQuery, StoreView};

#[derive(Clone)]
pub struct StoreService {
    repo: Arc<dyn StoreRepository>,
}

impl StoreService {
    pub fn new(repo: Arc<dyn StoreRepository>) -> Self {
        Self { repo }
    }

    pub async fn search(&self, query: StoreQuery) -> Result<Page<StoreView>, AppError> {
        let (filter, page) = query.into_filter()?;
        let stores = self.repo.search(&filter, page).await?;
        Ok(stores.map(StoreView::from))
    }

    pub async fn get(&self, id: i64) -> Result<StoreView, AppError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(StoreView::from)
            .ok_or(AppError::StoreNotFound)
    }

    pub async fn create(&self, payload: StorePayload) -> Result<StoreView, AppError> {
        let input = payload.into_input()?;
        let store = self.repo.create(&input).await?;
        tracing::info!(store_id = store.store.id, zone_id = input.zone_id, "Loja criada");
        Ok(store.into())
    }

    pub async fn update(&self, id: i64, payload: StorePayload) -> Result<StoreView, AppError> {
        let input = payload.into_input()?;
        let store = self.repo.update(id, &input).await?;
        tracing::info!(store_id = id, "Loja atualizada");
        Ok(store.into())
    }

    pub async fn delete(&self, id: i64) -> Result<Store, AppError> {
        let store = self.repo.delete(id).await?;
        tracing::info!(store_id = id, "Loja excluída");
        Ok(store)
    }
}
