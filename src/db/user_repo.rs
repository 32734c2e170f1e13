// src/db/user_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::common::{
    db_utils::{is_foreign_key_violation, is_unique_violation, like_pattern},
    error::AppError,
    pagination::{Page, PageRequest},
};
use crate::models::user::{NewUser, User, UserChanges, UserDetail, UserFilter, UserProfile};

// O repositório de usuários: tabela users e o vínculo com user_roles
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Mais recentes primeiro (created_at desc, id desc).
    async fn search(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<UserDetail>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<UserDetail>, AppError>;
    /// Comparação sem diferenciar maiúsculas.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    /// Cria o usuário e o vínculo com o cargo na mesma transação.
    async fn create(&self, input: &NewUser) -> Result<UserDetail, AppError>;
    /// O cargo informado substitui o anterior; `None` remove o vínculo.
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<UserDetail, AppError>;
    /// Só grava se o status atual for o oposto de `active`. Se outra escrita
    /// chegou antes, retorna `StatusChanged`.
    async fn set_active(&self, id: i64, active: bool) -> Result<UserDetail, AppError>;
    async fn set_password(&self, id: i64, password_hash: &str) -> Result<(), AppError>;
    async fn record_login(&self, id: i64) -> Result<(), AppError>;
    async fn delete(&self, id: i64) -> Result<User, AppError>;
}

const USER_COLUMNS: &str = r#"
    u.id, u.name, u.email, u.password_hash, u.phone, u.mobile, u.store_id,
    u.address, u.address_2, u.city, u.state, u.postal_code, u.country,
    u.is_active, u.last_login_at, u.email_verified_at, u.created_at, u.updated_at
"#;

fn select_detail() -> String {
    format!(
        r#"
        SELECT {USER_COLUMNS}, r.name AS role_name, s.name AS store_name
        FROM users u
        LEFT JOIN user_roles ur ON ur.user_id = u.id
        LEFT JOIN roles r ON r.id = ur.role_id
        LEFT JOIN stores s ON s.id = u.store_id
        "#
    )
}

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &UserFilter) {
        qb.push(" WHERE TRUE");

        if let Some(term) = &filter.search {
            let pattern = like_pattern(term);
            qb.push(" AND (u.name ILIKE ")
                .push_bind(pattern.clone())
                .push(" OR u.email ILIKE ")
                .push_bind(pattern)
                .push(")");
        }
        if let Some(active) = filter.status.is_active() {
            qb.push(" AND u.is_active = ").push_bind(active);
        }
        if let Some(role) = &filter.role {
            qb.push(" AND r.name = ").push_bind(role.clone());
        }
        if let Some(store_id) = filter.store_id {
            qb.push(" AND u.store_id = ").push_bind(store_id);
        }
    }

    async fn fetch_detail(tx: &mut Transaction<'_, Postgres>, id: i64) -> Result<UserDetail, AppError> {
        let sql = format!("{} WHERE u.id = $1", select_detail());
        let detail = sqlx::query_as::<_, UserDetail>(&sql)
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(detail)
    }

    /// Resolve o nome do cargo dentro da transação de escrita.
    async fn resolve_role(tx: &mut Transaction<'_, Postgres>, role: Option<&str>) -> Result<Option<i64>, AppError> {
        let Some(name) = role else {
            return Ok(None);
        };
        let role_id: Option<i64> = sqlx::query_scalar("SELECT id FROM roles WHERE name = $1 FOR KEY SHARE")
            .bind(name)
            .fetch_optional(&mut **tx)
            .await?;
        role_id
            .map(Some)
            .ok_or_else(|| AppError::field("role", "invalid_role"))
    }

    async fn check_store(tx: &mut Transaction<'_, Postgres>, profile: &UserProfile) -> Result<(), AppError> {
        let Some(store_id) = profile.store_id else {
            return Ok(());
        };
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM stores WHERE id = $1 FOR KEY SHARE")
            .bind(store_id)
            .fetch_optional(&mut **tx)
            .await?;
        found
            .map(|_| ())
            .ok_or_else(|| AppError::field("store_id", "invalid_store"))
    }

    async fn assign_role(tx: &mut Transaction<'_, Postgres>, user_id: i64, role_id: Option<i64>) -> Result<(), AppError> {
        sqlx::query("DELETE FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut **tx)
            .await?;

        if let Some(role_id) = role_id {
            sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                .bind(user_id)
                .bind(role_id)
                .execute(&mut **tx)
                .await?;
        }
        Ok(())
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if is_unique_violation(&e, "users_email_unique") {
        return AppError::field("email", "unique_email");
    }
    if is_foreign_key_violation(&e, "users_store_id_fkey") {
        return AppError::field("store_id", "invalid_store");
    }
    e.into()
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn search(&self, filter: &UserFilter, page: PageRequest) -> Result<Page<UserDetail>, AppError> {
        let mut count = QueryBuilder::<Postgres>::new(
            r#"
            SELECT COUNT(*)
            FROM users u
            LEFT JOIN user_roles ur ON ur.user_id = u.id
            LEFT JOIN roles r ON r.id = ur.role_id
            "#,
        );
        Self::push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new(select_detail());
        Self::push_filters(&mut qb, filter);
        qb.push(" ORDER BY u.created_at DESC, u.id DESC");
        qb.push(" LIMIT ").push_bind(page.limit());
        qb.push(" OFFSET ").push_bind(page.offset());

        let items = qb.build_query_as::<UserDetail>().fetch_all(&self.pool).await?;
        Ok(Page::new(items, total, page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<UserDetail>, AppError> {
        let sql = format!("{} WHERE u.id = $1", select_detail());
        let detail = sqlx::query_as::<_, UserDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(detail)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users u WHERE LOWER(u.email) = LOWER($1)");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn create(&self, input: &NewUser) -> Result<UserDetail, AppError> {
        let mut tx = self.pool.begin().await?;
        let role_id = Self::resolve_role(&mut tx, input.role.as_deref()).await?;
        Self::check_store(&mut tx, &input.profile).await?;

        let p = &input.profile;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO users (
                name, email, password_hash, phone, mobile, store_id,
                address, address_2, city, state, postal_code, country, is_active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&input.password_hash)
        .bind(&p.phone)
        .bind(&p.mobile)
        .bind(p.store_id)
        .bind(&p.address)
        .bind(&p.address_2)
        .bind(&p.city)
        .bind(&p.state)
        .bind(&p.postal_code)
        .bind(&p.country)
        .bind(input.is_active)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        Self::assign_role(&mut tx, id, role_id).await?;
        let detail = Self::fetch_detail(&mut tx, id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<UserDetail, AppError> {
        let mut tx = self.pool.begin().await?;
        let role_id = Self::resolve_role(&mut tx, changes.role.as_deref()).await?;
        Self::check_store(&mut tx, &changes.profile).await?;

        let p = &changes.profile;
        // COALESCE: hash ausente mantém a senha atual
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users SET
                name = $2, email = $3, password_hash = COALESCE($4, password_hash),
                phone = $5, mobile = $6, store_id = $7, address = $8, address_2 = $9,
                city = $10, state = $11, postal_code = $12, country = $13,
                is_active = COALESCE($14, is_active), updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.email)
        .bind(&changes.password_hash)
        .bind(&p.phone)
        .bind(&p.mobile)
        .bind(p.store_id)
        .bind(&p.address)
        .bind(&p.address_2)
        .bind(&p.city)
        .bind(&p.state)
        .bind(&p.postal_code)
        .bind(&p.country)
        .bind(changes.is_active)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let id = updated.ok_or(AppError::UserNotFound)?;
        Self::assign_role(&mut tx, id, role_id).await?;
        let detail = Self::fetch_detail(&mut tx, id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn set_active(&self, id: i64, active: bool) -> Result<UserDetail, AppError> {
        let mut tx = self.pool.begin().await?;
        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE users SET is_active = $2, updated_at = NOW()
            WHERE id = $1 AND is_active <> $2
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(active)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(id) = updated else {
            let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM users WHERE id = $1")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
            return Err(match exists {
                Some(_) => AppError::StatusChanged,
                None => AppError::UserNotFound,
            });
        };
        let detail = Self::fetch_detail(&mut tx, id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn set_password(&self, id: i64, password_hash: &str) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE users SET password_hash = $2, updated_at = NOW() WHERE id = $1")
            .bind(id)
            .bind(password_hash)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }

    async fn record_login(&self, id: i64) -> Result<(), AppError> {
        sqlx::query("UPDATE users SET last_login_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<User, AppError> {
        let sql = format!("DELETE FROM users u WHERE u.id = $1 RETURNING {USER_COLUMNS}");
        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::UserNotFound)
    }
}
