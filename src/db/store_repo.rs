// src/db/store_repo.rs

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};

use crate::common::{
    db_utils::{is_foreign_key_violation, like_pattern},
    error::AppError,
    pagination::{Page, PageRequest},
};
use crate::models::store::{Store, StoreDetail, StoreFilter, StoreInput};

#[async_trait]
pub trait StoreRepository: Send + Sync {
    async fn search(&self, filter: &StoreFilter, page: PageRequest) -> Result<Page<StoreDetail>, AppError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<StoreDetail>, AppError>;
    /// A zona informada precisa existir (`ZoneNotFound`).
    async fn create(&self, input: &StoreInput) -> Result<StoreDetail, AppError>;
    async fn update(&self, id: i64, input: &StoreInput) -> Result<StoreDetail, AppError>;
    /// Usuários da loja ficam com `store_id = NULL`.
    async fn delete(&self, id: i64) -> Result<Store, AppError>;
}

const SELECT_DETAIL: &str = r#"
    SELECT
        s.id, s.office_number, s.name, s.supervisor, s.email, s.phone, s.mobile,
        s.address, s.address_2, s.city, s.state, s.postal_code, s.country,
        s.zone_id, s.created_at, s.updated_at,
        z.name AS zone_name
    FROM stores s
    JOIN zones z ON z.id = s.zone_id
"#;

// Colunas da busca textual (OR entre elas)
const SEARCH_COLUMNS: &[&str] = &[
    "s.name",
    "s.supervisor",
    "s.email",
    "s.city",
    "s.address",
    "s.office_number",
];

#[derive(Clone)]
pub struct PgStoreRepository {
    pool: PgPool,
}

impl PgStoreRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn push_filters(qb: &mut QueryBuilder<'_, Postgres>, filter: &StoreFilter) {
        qb.push(" WHERE TRUE");

        if let Some(term) = &filter.search {
            let pattern = like_pattern(term);
            qb.push(" AND (");
            for (i, column) in SEARCH_COLUMNS.iter().enumerate() {
                if i > 0 {
                    qb.push(" OR ");
                }
                qb.push(*column).push(" ILIKE ").push_bind(pattern.clone());
            }
            qb.push(")");
        }
        if let Some(country) = &filter.country {
            qb.push(" AND s.country = ").push_bind(country.clone());
        }
        if let Some(zone_id) = filter.zone_id {
            qb.push(" AND s.zone_id = ").push_bind(zone_id);
        }
    }

    async fn lock_zone(tx: &mut Transaction<'_, Postgres>, zone_id: i64) -> Result<(), AppError> {
        // KEY SHARE: impede que a zona seja apagada antes do commit
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM zones WHERE id = $1 FOR KEY SHARE")
            .bind(zone_id)
            .fetch_optional(&mut **tx)
            .await?;
        found.map(|_| ()).ok_or(AppError::ZoneNotFound)
    }

    async fn fetch_detail(tx: &mut Transaction<'_, Postgres>, id: i64) -> Result<StoreDetail, AppError> {
        let sql = format!("{SELECT_DETAIL} WHERE s.id = $1");
        let detail = sqlx::query_as::<_, StoreDetail>(&sql)
            .bind(id)
            .fetch_one(&mut **tx)
            .await?;
        Ok(detail)
    }
}

fn map_write_error(e: sqlx::Error) -> AppError {
    if is_foreign_key_violation(&e, "stores_zone_id_fkey") {
        return AppError::ZoneNotFound;
    }
    e.into()
}

#[async_trait]
impl StoreRepository for PgStoreRepository {
    async fn search(&self, filter: &StoreFilter, page: PageRequest) -> Result<Page<StoreDetail>, AppError> {
        let mut count = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM stores s");
        Self::push_filters(&mut count, filter);
        let total: i64 = count.build_query_scalar::<i64>().fetch_one(&self.pool).await?;

        let mut qb = QueryBuilder::<Postgres>::new(SELECT_DETAIL);
        Self::push_filters(&mut qb, filter);
        // Coluna e direção vêm de enums fechados, nunca do texto do cliente
        qb.push(format!(
            " ORDER BY {} {}, s.id ASC",
            filter.sort.column(),
            filter.direction.keyword()
        ));
        qb.push(" LIMIT ").push_bind(page.limit());
        qb.push(" OFFSET ").push_bind(page.offset());

        let items = qb.build_query_as::<StoreDetail>().fetch_all(&self.pool).await?;
        Ok(Page::new(items, total, page))
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<StoreDetail>, AppError> {
        let sql = format!("{SELECT_DETAIL} WHERE s.id = $1");
        let detail = sqlx::query_as::<_, StoreDetail>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(detail)
    }

    async fn create(&self, input: &StoreInput) -> Result<StoreDetail, AppError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_zone(&mut tx, input.zone_id).await?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO stores (
                office_number, name, supervisor, email, phone, mobile,
                address, address_2, city, state, postal_code, country, zone_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING id
            "#,
        )
        .bind(&input.office_number)
        .bind(&input.name)
        .bind(&input.supervisor)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.mobile)
        .bind(&input.address)
        .bind(&input.address_2)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(input.zone_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let detail = Self::fetch_detail(&mut tx, id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn update(&self, id: i64, input: &StoreInput) -> Result<StoreDetail, AppError> {
        let mut tx = self.pool.begin().await?;
        Self::lock_zone(&mut tx, input.zone_id).await?;

        let updated: Option<i64> = sqlx::query_scalar(
            r#"
            UPDATE stores SET
                office_number = $2, name = $3, supervisor = $4, email = $5,
                phone = $6, mobile = $7, address = $8, address_2 = $9,
                city = $10, state = $11, postal_code = $12, country = $13,
                zone_id = $14, updated_at = NOW()
            WHERE id = $1
            RETURNING id
            "#,
        )
        .bind(id)
        .bind(&input.office_number)
        .bind(&input.name)
        .bind(&input.supervisor)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.mobile)
        .bind(&input.address)
        .bind(&input.address_2)
        .bind(&input.city)
        .bind(&input.state)
        .bind(&input.postal_code)
        .bind(&input.country)
        .bind(input.zone_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_write_error)?;

        let id = updated.ok_or(AppError::StoreNotFound)?;
        let detail = Self::fetch_detail(&mut tx, id).await?;
        tx.commit().await?;
        Ok(detail)
    }

    async fn delete(&self, id: i64) -> Result<Store, AppError> {
        sqlx::query_as::<_, Store>(
            r#"
            DELETE FROM stores
            WHERE id = $1
            RETURNING
                id, office_number, name, supervisor, email, phone, mobile,
                address, address_2, city, state, postal_code, country,
                zone_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::StoreNotFound)
    }
}
