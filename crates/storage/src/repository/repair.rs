use async_trait::async_trait;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use super::RepairStore;
use crate::dto::common::PaginationParams;
use crate::dto::repair::{CreateRepairRequest, RepairFilter, RepairSummary, UpdateRepairRequest};
use crate::error::{Result, StorageError};
use crate::models::RepairRecord;

/// PostgreSQL-backed repair store
#[derive(Clone)]
pub struct RepairRepository {
    pool: PgPool,
}

impl RepairRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RepairStore for RepairRepository {
    async fn create(&self, req: &CreateRepairRequest) -> Result<RepairRecord> {
        let mut tx = self.pool.begin().await?;

        let record = sqlx::query_as::<_, RepairRecord>(
            r#"
            INSERT INTO repairs (
                entry_date, exit_date, mechanic_name, mechanic_years_experience,
                vehicle_brand, vehicle_model, vehicle_year, vehicle_color, active
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE)
            RETURNING id, entry_date, exit_date, mechanic_name, mechanic_years_experience,
                      vehicle_brand, vehicle_model, vehicle_year, vehicle_color, active,
                      created_at, updated_at
            "#,
        )
        .bind(&req.entry_date)
        .bind(&req.exit_date)
        .bind(&req.mechanic_name)
        .bind(req.mechanic_years_experience)
        .bind(&req.vehicle_brand)
        .bind(&req.vehicle_model)
        .bind(&req.vehicle_year)
        .bind(&req.vehicle_color)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn find_active_by_id(&self, id: i64) -> Result<RepairRecord> {
        let record = sqlx::query_as::<_, RepairRecord>(
            r#"
            SELECT id, entry_date, exit_date, mechanic_name, mechanic_years_experience,
                   vehicle_brand, vehicle_model, vehicle_year, vehicle_color, active,
                   created_at, updated_at
            FROM repairs
            WHERE id = $1 AND active
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(record)
    }

    async fn find_by_id(&self, id: i64) -> Result<RepairRecord> {
        let record = sqlx::query_as::<_, RepairRecord>(
            r#"
            SELECT id, entry_date, exit_date, mechanic_name, mechanic_years_experience,
                   vehicle_brand, vehicle_model, vehicle_year, vehicle_color, active,
                   created_at, updated_at
            FROM repairs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(record)
    }

    async fn list_active_filtered(
        &self,
        filter: &RepairFilter,
        pagination: &PaginationParams,
    ) -> Result<(Vec<RepairRecord>, i64)> {
        // Count and page are read from one snapshot so the total matches the page.
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total_items = count_active(&mut *tx, filter).await?;

        let mut query = QueryBuilder::<Postgres>::new(
            r#"
            SELECT id, entry_date, exit_date, mechanic_name, mechanic_years_experience,
                   vehicle_brand, vehicle_model, vehicle_year, vehicle_color, active,
                   created_at, updated_at
            FROM repairs
            WHERE active
            "#,
        );
        push_filter(&mut query, filter);
        query.push(" ORDER BY id LIMIT ");
        query.push_bind(pagination.limit() as i64);
        query.push(" OFFSET ");
        query.push_bind(pagination.offset() as i64);

        let records: Vec<RepairRecord> = query.build_query_as().fetch_all(&mut *tx).await?;

        tx.commit().await?;

        Ok((records, total_items))
    }

    async fn update(&self, id: i64, patch: &UpdateRepairRequest) -> Result<RepairRecord> {
        let mut tx = self.pool.begin().await?;

        let mut record = sqlx::query_as::<_, RepairRecord>(
            r#"
            SELECT id, entry_date, exit_date, mechanic_name, mechanic_years_experience,
                   vehicle_brand, vehicle_model, vehicle_year, vehicle_color, active,
                   created_at, updated_at
            FROM repairs
            WHERE id = $1 AND active
            FOR UPDATE
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(StorageError::NotFound)?;

        record.apply_patch(patch);

        let updated = sqlx::query_as::<_, RepairRecord>(
            r#"
            UPDATE repairs
            SET entry_date = $2,
                exit_date = $3,
                mechanic_name = $4,
                mechanic_years_experience = $5,
                vehicle_brand = $6,
                vehicle_model = $7,
                vehicle_year = $8,
                vehicle_color = $9,
                updated_at = (NOW() AT TIME ZONE 'utc')
            WHERE id = $1
            RETURNING id, entry_date, exit_date, mechanic_name, mechanic_years_experience,
                      vehicle_brand, vehicle_model, vehicle_year, vehicle_color, active,
                      created_at, updated_at
            "#,
        )
        .bind(record.id)
        .bind(&record.entry_date)
        .bind(&record.exit_date)
        .bind(&record.mechanic_name)
        .bind(record.mechanic_years_experience)
        .bind(&record.vehicle_brand)
        .bind(&record.vehicle_model)
        .bind(&record.vehicle_year)
        .bind(&record.vehicle_color)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(updated)
    }

    async fn deactivate(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE repairs
            SET active = FALSE,
                updated_at = (NOW() AT TIME ZONE 'utc')
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn list_summaries(&self) -> Result<Vec<RepairSummary>> {
        let summaries = sqlx::query_as::<_, RepairSummary>(
            r#"
            SELECT id, entry_date, exit_date, mechanic_name, vehicle_brand, vehicle_model
            FROM repairs
            WHERE active
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }
}

async fn count_active(conn: &mut PgConnection, filter: &RepairFilter) -> Result<i64> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT COUNT(*) FROM repairs WHERE active");
    push_filter(&mut query, filter);

    let count = query
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

fn push_filter(query: &mut QueryBuilder<'_, Postgres>, filter: &RepairFilter) {
    if let Some(brand) = filter.brand_term() {
        query.push(" AND vehicle_brand ILIKE ");
        query.push_bind(contains_pattern(brand));
    }

    if let Some(model) = filter.model_term() {
        query.push(" AND vehicle_model ILIKE ");
        query.push_bind(contains_pattern(model));
    }
}

/// Wraps a user term in `%` after escaping the LIKE metacharacters, so the
/// term only ever matches literally.
fn contains_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
