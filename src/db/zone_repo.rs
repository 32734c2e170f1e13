// src/db/zone_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::common::{db_utils::is_unique_violation, error::AppError};
use crate::models::zone::Zone;

#[async_trait]
pub trait ZoneRepository: Send + Sync {
    /// Todas as zonas, ordenadas por nome.
    async fn list(&self) -> Result<Vec<Zone>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Zone>, AppError>;
    async fn create(&self, name: &str) -> Result<Zone, AppError>;
    async fn update(&self, id: i64, name: &str) -> Result<Zone, AppError>;
    /// Remove a zona e devolve o registro apagado. Falha com `ZoneInUse`
    /// enquanto alguma loja apontar para ela.
    async fn delete(&self, id: i64) -> Result<Zone, AppError>;
}

#[derive(Clone)]
pub struct PgZoneRepository {
    pool: PgPool,
}

impl PgZoneRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e, "zones_name_unique") {
        return AppError::field("name", "unique_name");
    }
    e.into()
}

#[async_trait]
impl ZoneRepository for PgZoneRepository {
    async fn list(&self) -> Result<Vec<Zone>, AppError> {
        let zones = sqlx::query_as::<_, Zone>(
            "SELECT id, name, created_at, updated_at FROM zones ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(zones)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Zone>, AppError> {
        let zone = sqlx::query_as::<_, Zone>(
            "SELECT id, name, created_at, updated_at FROM zones WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(zone)
    }

    async fn create(&self, name: &str) -> Result<Zone, AppError> {
        sqlx::query_as::<_, Zone>(
            r#"
            INSERT INTO zones (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await
        .map_err(map_write_error)
    }

    async fn update(&self, id: i64, name: &str) -> Result<Zone, AppError> {
        sqlx::query_as::<_, Zone>(
            r#"
            UPDATE zones
            SET name = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_write_error)?
        .ok_or(AppError::ZoneNotFound)
    }

    async fn delete(&self, id: i64) -> Result<Zone, AppError> {
        let mut tx = self.pool.begin().await?;

        // Trava a linha: novas lojas precisam de KEY SHARE nela pela FK
        let zone = sqlx::query_as::<_, Zone>(
            "SELECT id, name, created_at, updated_at FROM zones WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::ZoneNotFound)?;

        let stores: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stores WHERE zone_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if stores > 0 {
            return Err(AppError::ZoneInUse { name: zone.name, stores });
        }

        sqlx::query("DELETE FROM zones WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(zone)
    }
}
