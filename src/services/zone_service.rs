// src/services/zone_service.rs

use std::sync::Arc;

use validator::Validate;

use crate::common::error::AppError;
use crate::db::ZoneRepository;
use crate::models::zone::{Zone, ZonePayload};

#[derive(Clone)]
pub struct ZoneService {
    repo: Arc<dyn ZoneRepository>,
}

impl ZoneService {
    pub fn new(repo: Arc<dyn ZoneRepository>) -> Self {
        Self { repo }
    }

    pub async fn list(&self) -> Result<Vec<Zone>, AppError> {
        self.repo.list().await
    }

    pub async fn get(&self, id: i64) -> Result<Zone, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::ZoneNotFound)
    }

    pub async fn create(&self, payload: ZonePayload) -> Result<Zone, AppError> {
        payload.validate()?;
        let zone = self.repo.create(&payload.name).await?;
        tracing::info!(zone_id = zone.id, "Zona criada");
        Ok(zone)
    }

    pub async fn update(&self, id: i64, payload: ZonePayload) -> Result<Zone, AppError> {
        payload.validate()?;
        let zone = self.repo.update(id, &payload.name).await?;
        tracing::info!(zone_id = zone.id, "Zona atualizada");
        Ok(zone)
    }

    pub async fn delete(&self, id: i64) -> Result<Zone, AppError> {
        match self.repo.delete(id).await {
            Ok(zone) => {
                tracing::info!(zone_id = zone.id, "Zona excluída");
                Ok(zone)
            }
            Err(e @ AppError::ZoneInUse { .. }) => {
                tracing::warn!(zone_id = id, "Exclusão recusada: {}", e);
                Err(e)
            }
            Err(e) => Err(e),
        }
    }
}
