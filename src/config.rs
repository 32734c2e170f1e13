// src/config.rs

use std::{str::FromStr, sync::Arc, time::Duration};

use anyhow::{anyhow, Context};
use sqlx::PgPool;

use crate::{
    common::i18n::I18nStore,
    db::Repositories,
    services::{
        auth::AuthService, rbac_service::RbacService, store_service::StoreService,
        user_service::UserService, zone_service::ZoneService,
    },
};

/// Conta criada na inicialização quando `ADMIN_*` está definido.
#[derive(Debug, Clone)]
pub struct AdminBootstrap {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub seed_on_startup: bool,
    pub security: SecuritySettings,
    pub admin: Option<AdminBootstrap>,
}

/// Parâmetros de token e de hashing.
#[derive(Debug, Clone)]
pub struct SecuritySettings {
    pub jwt_secret: String,
    pub jwt_ttl: chrono::Duration,
    pub bcrypt_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Monta a configuração a partir de qualquer fonte de variáveis.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = get("DATABASE_URL").ok_or_else(|| anyhow!("DATABASE_URL deve ser definida"))?;
        let jwt_secret = get("JWT_SECRET").ok_or_else(|| anyhow!("JWT_SECRET deve ser definido"))?;

        let admin = match (get("ADMIN_NAME"), get("ADMIN_EMAIL"), get("ADMIN_PASSWORD")) {
            (Some(name), Some(email), Some(password)) => Some(AdminBootstrap { name, email, password }),
            (None, None, None) => None,
            _ => {
                return Err(anyhow!(
                    "ADMIN_NAME, ADMIN_EMAIL e ADMIN_PASSWORD devem ser definidas juntas"
                ))
            }
        };

        Ok(Self {
            database_url,
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            db_max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout: Duration::from_secs(parse_or(
                get("DB_ACQUIRE_TIMEOUT_SECS"),
                "DB_ACQUIRE_TIMEOUT_SECS",
                3,
            )?),
            seed_on_startup: parse_or(get("SEED_ON_STARTUP"), "SEED_ON_STARTUP", true)?,
            security: SecuritySettings {
                jwt_secret,
                jwt_ttl: chrono::Duration::hours(parse_or(get("JWT_TTL_HOURS"), "JWT_TTL_HOURS", 168)?),
                bcrypt_cost: parse_or(get("BCRYPT_COST"), "BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            },
            admin,
        })
    }
}

fn parse_or<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("Valor inválido para {key}: '{raw}'")),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub zone_service: ZoneService,
    pub store_service: StoreService,
    pub user_service: UserService,
    pub rbac_service: RbacService,
    pub auth_service: AuthService,
    pub i18n_store: Arc<I18nStore>,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn new(repos: Repositories, security: SecuritySettings) -> Self {
        Self {
            zone_service: ZoneService::new(repos.zones.clone()),
            store_service: StoreService::new(repos.stores.clone()),
            user_service: UserService::new(repos.users.clone(), security.bcrypt_cost),
            rbac_service: RbacService::new(repos.rbac.clone()),
            auth_service: AuthService::new(repos.users, repos.rbac, security),
            i18n_store: Arc::new(I18nStore::default()),
        }
    }

    pub fn from_pool(pool: PgPool, config: &AppConfig) -> Self {
        Self::new(Repositories::postgres(pool), config.security.clone())
    }
}
