// src/db/rbac_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::common::{
    db_utils::{is_unique_violation, like_pattern},
    error::AppError,
    pagination::{Page, PageRequest},
};
use crate::models::{
    rbac::{Permission, Role, RoleSummary},
    user::User,
};

#[async_trait]
pub trait RbacRepository: Send + Sync {
    /// Todas as permissões, ordenadas por nome.
    async fn list_permissions(&self) -> Result<Vec<Permission>, AppError>;
    async fn search_roles(&self, search: Option<&str>, page: PageRequest) -> Result<Page<RoleSummary>, AppError>;
    async fn find_role(&self, id: i64) -> Result<Option<RoleSummary>, AppError>;
    /// Cria o cargo com exatamente as permissões informadas.
    /// Nomes desconhecidos geram erro de validação em `permissions`.
    async fn create_role(&self, name: &str, permissions: &[String]) -> Result<RoleSummary, AppError>;
    /// Renomeia e substitui o conjunto de permissões (sync).
    async fn update_role(&self, id: i64, name: &str, permissions: &[String]) -> Result<RoleSummary, AppError>;
    /// Falha com `RoleInUse` enquanto algum usuário tiver o cargo.
    async fn delete_role(&self, id: i64) -> Result<Role, AppError>;
    async fn users_of_role(&self, role_id: i64) -> Result<Vec<User>, AppError>;
    async fn user_role(&self, user_id: i64) -> Result<Option<Role>, AppError>;
    /// Nomes das permissões efetivas do usuário (via cargo).
    async fn user_permissions(&self, user_id: i64) -> Result<Vec<String>, AppError>;

    // --- Semeadura idempotente ---
    async fn ensure_permission(&self, name: &str) -> Result<(), AppError>;
    /// Garante o cargo e concede as permissões que faltarem, sem remover nenhuma.
    async fn ensure_role(&self, name: &str, permissions: &[&str]) -> Result<Role, AppError>;
}

const SELECT_SUMMARY: &str = r#"
    SELECT
        r.id, r.name, r.created_at, r.updated_at,
        COALESCE(ARRAY_AGG(p.name ORDER BY p.name) FILTER (WHERE p.name IS NOT NULL), '{}') AS permissions,
        COUNT(p.id) AS permissions_count,
        (SELECT COUNT(*) FROM user_roles ur WHERE ur.role_id = r.id) AS users_count
    FROM roles r
    LEFT JOIN role_permissions rp ON rp.role_id = r.id
    LEFT JOIN permissions p ON p.id = rp.permission_id
"#;

#[derive(Clone)]
pub struct PgRbacRepository {
    pool: PgPool,
}

impl PgRbacRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_summary(tx: &mut Transaction<'_, Postgres>, id: i64) -> Result<RoleSummary, AppError> {
        let sql = format!("{SELECT_SUMMARY} WHERE r.id = $1 GROUP BY r.id");
        let summary = sqlx::query_as::<_, RoleSummary>(&sql)
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(summary)
    }

    // Buscar IDs das permissões pelos nomes ("users.view" -> id)
    async fn resolve_permissions(tx: &mut Transaction<'_, Postgres>, names: &[String]) -> Result<Vec<i64>, AppError> {
        let ids: Vec<i64> = sqlx::query_scalar("SELECT id FROM permissions WHERE name = ANY($1)")
            .bind(names)
            .fetch_all(&mut **tx)
            .await?;

        let mut requested: Vec<&String> = names.iter().collect();
        requested.sort();
        requested.dedup();
        if ids.len() != requested.len() {
            return Err(AppError::field("permissions", "invalid_permission"));
        }
        Ok(ids)
    }

    // Vincular Cargo <-> Permissão, substituindo o conjunto anterior
    async fn sync_permissions(tx: &mut Transaction<'_, Postgres>, role_id: i64, permission_ids: &[i64]) -> Result<(), AppError> {
        sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
            .bind(role_id)
            .execute(&mut **tx)
            .await?;

        // Inserção em massa usando UNNEST
        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            SELECT $1, unnest($2::bigint[])
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role_id)
        .bind(permission_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e, "roles_name_unique") {
        return AppError::field("name", "unique_name");
    }
    e.into()
}

#[async_trait]
impl RbacRepository for PgRbacRepository {
    async fn list_permissions(&self) -> Result<Vec<Permission>, AppError> {
        let permissions = sqlx::query_as::<_, Permission>("SELECT id, name FROM permissions ORDER BY name")
            .fetch_all(&self.pool)
            .await?;
        Ok(permissions)
    }

    async fn search_roles(&self, search: Option<&str>, page: PageRequest) -> Result<Page<RoleSummary>, AppError> {
        let pattern = search.map(like_pattern);

        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM roles r");
        if let Some(pattern) = &pattern {
            count.push(" WHERE r.name ILIKE ").push_bind(pattern.clone());
        }
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_SUMMARY);
        if let Some(pattern) = pattern {
            qb.push(" WHERE r.name ILIKE ").push_bind(pattern);
        }
        qb.push(" GROUP BY r.id ORDER BY r.name, r.id");
        qb.push(" LIMIT ").push_bind(page.limit());
        qb.push(" OFFSET ").push_bind(page.offset());

        let items = qb.build_query_as::<RoleSummary>().fetch_all(&self.pool).await?;
        Ok(Page::new(items, total, page))
    }

    async fn find_role(&self, id: i64) -> Result<Option<RoleSummary>, AppError> {
        let sql = format!("{SELECT_SUMMARY} WHERE r.id = $1 GROUP BY r.id");
        let summary = sqlx::query_as::<_, RoleSummary>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(summary)
    }

    async fn create_role(&self, name: &str, permissions: &[String]) -> Result<RoleSummary, AppError> {
        let mut tx = self.pool.begin().await?;
        let permission_ids = Self::resolve_permissions(&mut tx, permissions).await?;

        let role_id: i64 = sqlx::query_scalar("INSERT INTO roles (name) VALUES ($1) RETURNING id")
            .bind(name)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_write_error)?;

        Self::sync_permissions(&mut tx, role_id, &permission_ids).await?;
        let summary = Self::fetch_summary(&mut tx, role_id).await?;
        tx.commit().await?;
        Ok(summary)
    }

    async fn update_role(&self, id: i64, name: &str, permissions: &[String]) -> Result<RoleSummary, AppError> {
        let mut tx = self.pool.begin().await?;
        let permission_ids = Self::resolve_permissions(&mut tx, permissions).await?;

        let updated: Option<i64> = sqlx::query_scalar(
            "UPDATE roles SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING id",
        )
        .bind(id)
        .bind(name)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let role_id = updated.ok_or(AppError::RoleNotFound)?;
        Self::sync_permissions(&mut tx, role_id, &permission_ids).await?;
        let summary = Self::fetch_summary(&mut tx, role_id).await?;
        tx.commit().await?;
        Ok(summary)
    }

    async fn delete_role(&self, id: i64) -> Result<Role, AppError> {
        let mut tx = self.pool.begin().await?;

        // A trava serializa contra novas atribuições (KEY SHARE da FK)
        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, created_at, updated_at FROM roles WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::RoleNotFound)?;

        let users: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM user_roles WHERE role_id = $1")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        if users > 0 {
            return Err(AppError::RoleInUse { name: role.name, users });
        }

        sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(role)
    }

    async fn users_of_role(&self, role_id: i64) -> Result<Vec<User>, AppError> {
        let users = sqlx::query_as::<_, User>(
            r#"
            SELECT
                u.id, u.name, u.email, u.password_hash, u.phone, u.mobile, u.store_id,
                u.address, u.address_2, u.city, u.state, u.postal_code, u.country,
                u.is_active, u.last_login_at, u.email_verified_at, u.created_at, u.updated_at
            FROM users u
            JOIN user_roles ur ON ur.user_id = u.id
            WHERE ur.role_id = $1
            ORDER BY u.name, u.id
            "#,
        )
        .bind(role_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(users)
    }

    async fn user_role(&self, user_id: i64) -> Result<Option<Role>, AppError> {
        let role = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.id, r.name, r.created_at, r.updated_at
            FROM roles r
            JOIN user_roles ur ON ur.role_id = r.id
            WHERE ur.user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(role)
    }

    async fn user_permissions(&self, user_id: i64) -> Result<Vec<String>, AppError> {
        let names: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT p.name
            FROM user_roles ur
            JOIN role_permissions rp ON rp.role_id = ur.role_id
            JOIN permissions p ON p.id = rp.permission_id
            WHERE ur.user_id = $1
            ORDER BY p.name
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(names)
    }

    async fn ensure_permission(&self, name: &str) -> Result<(), AppError> {
        sqlx::query("INSERT INTO permissions (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ensure_role(&self, name: &str, permissions: &[&str]) -> Result<Role, AppError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("INSERT INTO roles (name) VALUES ($1) ON CONFLICT (name) DO NOTHING")
            .bind(name)
            .execute(&mut *tx)
            .await?;

        let role = sqlx::query_as::<_, Role>(
            "SELECT id, name, created_at, updated_at FROM roles WHERE name = $1",
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO role_permissions (role_id, permission_id)
            SELECT $1, p.id FROM permissions p WHERE p.name = ANY($2)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(role.id)
        .bind(permissions)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(role)
    }
}
