//! Postgres-backed SKU audit table.
//!
//! Every statement carries `tenant_id` in its WHERE clause. The synchronous
//! [`SkuLogStore`] methods run on the caller's multi-threaded tokio runtime via
//! `block_in_place`; calling them with no runtime, or from a current-thread
//! runtime, yields [`SkuLogStoreError::Runtime`].

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool, Row};
use tokio::runtime::RuntimeFlavor;

use packtrace_core::{AggregateId, TenantId};
use packtrace_products::ProductId;
use packtrace_sales::{OrderLineId, SalesOrderId};

use super::query::{Pagination, SkuLogFilter, SkuLogPage, SkuLogQuery};
use super::{NewSkuLogEntry, SkuLogEntry, SkuLogEntryId, SkuLogStore, SkuLogStoreError};

/// Table and index definitions, applied by [`PostgresSkuLogStore::migrate`].
pub const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS sku_logs (
    id                   UUID PRIMARY KEY,
    tenant_id            UUID NOT NULL,
    date                 TIMESTAMPTZ NOT NULL DEFAULT now(),
    order_id             UUID NOT NULL,
    order_line_id        UUID NOT NULL,
    pack_product_id      UUID NOT NULL,
    component_product_id UUID NOT NULL,
    sku                  TEXT NOT NULL DEFAULT ''
);
CREATE INDEX IF NOT EXISTS sku_logs_tenant_order_idx ON sku_logs (tenant_id, order_id);
CREATE INDEX IF NOT EXISTS sku_logs_tenant_line_idx ON sku_logs (tenant_id, order_line_id);
CREATE INDEX IF NOT EXISTS sku_logs_tenant_date_idx ON sku_logs (tenant_id, date DESC);
"#;

pub struct PostgresSkuLogStore {
    pool: Arc<PgPool>,
}

impl PostgresSkuLogStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Create the table and its indexes if missing.
    pub async fn migrate(&self) -> Result<(), SkuLogStoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }

    pub async fn insert(&self, tenant_id: TenantId, entry: NewSkuLogEntry) -> Result<SkuLogEntry, SkuLogStoreError> {
        let stored = entry.into_entry(tenant_id, Utc::now());

        sqlx::query(
            r#"
            INSERT INTO sku_logs
                (id, tenant_id, date, order_id, order_line_id, pack_product_id, component_product_id, sku)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(stored.id.0.as_uuid())
        .bind(stored.tenant_id.as_uuid())
        .bind(stored.date)
        .bind(stored.order_id.0.as_uuid())
        .bind(stored.order_line_id.0.as_uuid())
        .bind(stored.pack_product_id.0.as_uuid())
        .bind(stored.component_product_id.0.as_uuid())
        .bind(&stored.sku)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_sku_log", e))?;

        Ok(stored)
    }

    pub async fn purge_order(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Result<u64, SkuLogStoreError> {
        let result = sqlx::query("DELETE FROM sku_logs WHERE tenant_id = $1 AND order_id = $2")
            .bind(tenant_id.as_uuid())
            .bind(order_id.0.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_sku_logs_for_order", e))?;
        Ok(result.rows_affected())
    }

    pub async fn purge_line(&self, tenant_id: TenantId, line_id: OrderLineId) -> Result<u64, SkuLogStoreError> {
        let result = sqlx::query("DELETE FROM sku_logs WHERE tenant_id = $1 AND order_line_id = $2")
            .bind(tenant_id.as_uuid())
            .bind(line_id.0.as_uuid())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_sku_logs_for_line", e))?;
        Ok(result.rows_affected())
    }

    fn block_on<T>(&self, fut: impl Future<Output = Result<T, SkuLogStoreError>>) -> Result<T, SkuLogStoreError> {
        let handle =
            tokio::runtime::Handle::try_current().map_err(|e| SkuLogStoreError::Runtime(e.to_string()))?;
        // block_in_place panics outside the multi-threaded scheduler.
        if !matches!(handle.runtime_flavor(), RuntimeFlavor::MultiThread) {
            return Err(SkuLogStoreError::Runtime(format!(
                "blocking sku log calls need a multi-threaded runtime, found {:?}",
                handle.runtime_flavor()
            )));
        }
        tokio::task::block_in_place(|| handle.block_on(fut))
    }
}

impl SkuLogStore for PostgresSkuLogStore {
    fn append(&self, tenant_id: TenantId, entry: NewSkuLogEntry) -> Result<SkuLogEntry, SkuLogStoreError> {
        self.block_on(self.insert(tenant_id, entry))
    }

    fn delete_for_order(&self, tenant_id: TenantId, order_id: SalesOrderId) -> Result<u64, SkuLogStoreError> {
        self.block_on(self.purge_order(tenant_id, order_id))
    }

    fn delete_for_line(&self, tenant_id: TenantId, line_id: OrderLineId) -> Result<u64, SkuLogStoreError> {
        self.block_on(self.purge_line(tenant_id, line_id))
    }
}

#[async_trait::async_trait]
impl SkuLogQuery for PostgresSkuLogStore {
    async fn query(
        &self,
        tenant_id: TenantId,
        filter: SkuLogFilter,
        pagination: Pagination,
    ) -> Result<SkuLogPage, SkuLogStoreError> {
        let order_param = filter.order_id.map(|id| *id.0.as_uuid());
        let line_param = filter.order_line_id.map(|id| *id.0.as_uuid());
        let pack_param = filter.pack_product_id.map(|id| *id.0.as_uuid());
        let component_param = filter.component_product_id.map(|id| *id.0.as_uuid());

        let count_row = sqlx::query(
            r#"
            SELECT COUNT(*) AS total
            FROM sku_logs
            WHERE tenant_id = $1
                AND ($2::uuid IS NULL OR order_id = $2)
                AND ($3::uuid IS NULL OR order_line_id = $3)
                AND ($4::uuid IS NULL OR pack_product_id = $4)
                AND ($5::uuid IS NULL OR component_product_id = $5)
                AND ($6::timestamptz IS NULL OR date >= $6)
                AND ($7::timestamptz IS NULL OR date <= $7)
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(order_param)
        .bind(line_param)
        .bind(pack_param)
        .bind(component_param)
        .bind(filter.recorded_after)
        .bind(filter.recorded_before)
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("count_sku_logs", e))?;

        let total: i64 = count_row
            .try_get("total")
            .map_err(|e| SkuLogStoreError::Corrupt(format!("failed to read count: {e}")))?;

        let rows = sqlx::query(
            r#"
            SELECT id, tenant_id, date, order_id, order_line_id, pack_product_id, component_product_id, sku
            FROM sku_logs
            WHERE tenant_id = $1
                AND ($2::uuid IS NULL OR order_id = $2)
                AND ($3::uuid IS NULL OR order_line_id = $3)
                AND ($4::uuid IS NULL OR pack_product_id = $4)
                AND ($5::uuid IS NULL OR component_product_id = $5)
                AND ($6::timestamptz IS NULL OR date >= $6)
                AND ($7::timestamptz IS NULL OR date <= $7)
            ORDER BY date DESC, id ASC
            LIMIT $8 OFFSET $9
            "#,
        )
        .bind(tenant_id.as_uuid())
        .bind(order_param)
        .bind(line_param)
        .bind(pack_param)
        .bind(component_param)
        .bind(filter.recorded_after)
        .bind(filter.recorded_before)
        .bind(i64::from(pagination.limit))
        .bind(i64::from(pagination.offset))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("query_sku_logs", e))?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            let entry = SkuLogRow::from_row(&row)
                .map_err(|e| SkuLogStoreError::Corrupt(format!("failed to decode sku log row: {e}")))?;
            entries.push(entry.into());
        }

        Ok(SkuLogPage::new(entries, total.max(0) as u64, pagination))
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> SkuLogStoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            SkuLogStoreError::Storage(format!("database error in {operation}: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => SkuLogStoreError::Storage(format!("connection pool closed in {operation}")),
        other => SkuLogStoreError::Storage(format!("{operation}: {other}")),
    }
}

#[derive(Debug)]
struct SkuLogRow {
    id: uuid::Uuid,
    tenant_id: uuid::Uuid,
    date: DateTime<Utc>,
    order_id: uuid::Uuid,
    order_line_id: uuid::Uuid,
    pack_product_id: uuid::Uuid,
    component_product_id: uuid::Uuid,
    sku: String,
}

impl<'r> FromRow<'r, sqlx::postgres::PgRow> for SkuLogRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(SkuLogRow {
            id: row.try_get("id")?,
            tenant_id: row.try_get("tenant_id")?,
            date: row.try_get("date")?,
            order_id: row.try_get("order_id")?,
            order_line_id: row.try_get("order_line_id")?,
            pack_product_id: row.try_get("pack_product_id")?,
            component_product_id: row.try_get("component_product_id")?,
            sku: row.try_get("sku")?,
        })
    }
}

impl From<SkuLogRow> for SkuLogEntry {
    fn from(row: SkuLogRow) -> Self {
        SkuLogEntry {
            id: SkuLogEntryId::new(AggregateId::from_uuid(row.id)),
            tenant_id: TenantId::from_uuid(row.tenant_id),
            date: row.date,
            order_id: SalesOrderId::new(AggregateId::from_uuid(row.order_id)),
            order_line_id: OrderLineId::new(AggregateId::from_uuid(row.order_line_id)),
            pack_product_id: ProductId::new(AggregateId::from_uuid(row.pack_product_id)),
            component_product_id: ProductId::new(AggregateId::from_uuid(row.component_product_id)),
            sku: row.sku,
        }
    }
}
