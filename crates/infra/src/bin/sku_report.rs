use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::Parser;
use uuid::Uuid;

use packtrace_core::{AggregateId, TenantId};
use packtrace_infra::sku_log::{Pagination, PostgresSkuLogStore, SkuLogFilter, SkuLogQuery};
use packtrace_infra::PackTraceConfig;
use packtrace_products::ProductId;
use packtrace_sales::{OrderLineId, SalesOrderId};

/// List component SKU audit records as JSON lines.
#[derive(Parser)]
#[command(name = "packtrace-sku-report")]
#[command(about = "List component SKU records captured at order confirmation")]
struct Args {
    /// Tenant whose records are listed
    #[arg(long)]
    tenant: TenantId,

    /// Only records of this sales order
    #[arg(long)]
    order: Option<Uuid>,

    /// Only records of this order line
    #[arg(long)]
    line: Option<Uuid>,

    /// Only records whose pack/kit product is this one
    #[arg(long)]
    pack: Option<Uuid>,

    /// Only records for this component product
    #[arg(long)]
    component: Option<Uuid>,

    /// Recorded at or after (RFC 3339)
    #[arg(long)]
    after: Option<DateTime<Utc>>,

    /// Recorded at or before (RFC 3339)
    #[arg(long)]
    before: Option<DateTime<Utc>>,

    #[arg(long, default_value_t = 50)]
    limit: u32,

    #[arg(long, default_value_t = 0)]
    offset: u32,

    /// Postgres URL (defaults to DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,

    /// Create the audit table if it does not exist
    #[arg(long)]
    migrate: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = PackTraceConfig::from_env()?;
    packtrace_observability::init_with(config.log_format);

    let database_url = args
        .database_url
        .or(config.database_url)
        .context("no database: pass --database-url or set DATABASE_URL")?;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(2)
        .connect(&database_url)
        .await
        .context("failed to connect to postgres")?;
    let store = PostgresSkuLogStore::new(pool);

    if args.migrate {
        store.migrate().await?;
        tracing::info!("sku_logs schema ensured");
    }

    let filter = SkuLogFilter {
        order_id: args.order.map(|id| SalesOrderId::new(AggregateId::from_uuid(id))),
        order_line_id: args.line.map(|id| OrderLineId::new(AggregateId::from_uuid(id))),
        pack_product_id: args.pack.map(|id| ProductId::new(AggregateId::from_uuid(id))),
        component_product_id: args.component.map(|id| ProductId::new(AggregateId::from_uuid(id))),
        recorded_after: args.after,
        recorded_before: args.before,
    };
    let pagination = Pagination::new(Some(args.limit), Some(args.offset));

    let page = store.query(args.tenant, filter, pagination).await?;
    for entry in &page.entries {
        println!("{}", serde_json::to_string(entry)?);
    }

    tracing::info!(
        tenant_id = %args.tenant,
        returned = page.entries.len(),
        total = page.total,
        has_more = page.has_more,
        "sku report finished"
    );
    Ok(())
}
