pub mod rbac_repo;
pub mod store_repo;
pub mod user_repo;
pub mod zone_repo;

use std::sync::Arc;

use sqlx::{postgres::PgPoolOptions, PgPool};

pub use rbac_repo::{PgRbacRepository, RbacRepository};
pub use store_repo::{PgStoreRepository, StoreRepository};
pub use user_repo::{PgUserRepository, UserRepository};
pub use zone_repo::{PgZoneRepository, ZoneRepository};

use crate::config::AppConfig;

/// Conjunto de repositórios entregue aos serviços.
#[derive(Clone)]
pub struct Repositories {
    pub zones: Arc<dyn ZoneRepository>,
    pub stores: Arc<dyn StoreRepository>,
    pub users: Arc<dyn UserRepository>,
    pub rbac: Arc<dyn RbacRepository>,
}

impl Repositories {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            zones: Arc::new(PgZoneRepository::new(pool.clone())),
            stores: Arc::new(PgStoreRepository::new(pool.clone())),
            users: Arc::new(PgUserRepository::new(pool.clone())),
            rbac: Arc::new(PgRbacRepository::new(pool)),
        }
    }
}

// Conecta ao banco de dados, usando '?' para propagar erros
pub async fn connect(config: &AppConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(config.db_acquire_timeout)
        .connect(&config.database_url)
        .await?;

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(pool)
}

pub async fn migrate(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!().run(pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");
    Ok(())
}
