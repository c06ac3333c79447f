use serde::Serialize;

use packtrace_core::TenantId;
use packtrace_sales::{OrderLine, SalesOrder, SalesOrderId};

use super::{distinct, OrderConfirmation, SalesOrderReader};
use crate::catalog::ProductCatalog;
use crate::resolver::ComponentResolver;
use crate::sku_log::{NewSkuLogEntry, SkuLogStore};

/// Tracing target of the per-component audit lines.
pub const SKU_LOG_TARGET: &str = "packtrace::sku";

/// Counters for one logging pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ComponentLogSummary {
    pub orders: usize,
    /// Lines carrying a product.
    pub lines_inspected: usize,
    /// Lines whose product resolved to at least one component.
    pub kit_lines: usize,
    pub records_written: usize,
    pub persistence_failures: usize,
    /// Product references missing from the catalog (pack or component).
    pub missing_products: usize,
}

/// Wraps an [`OrderConfirmation`] and records the component SKUs of every kit
/// line once the wrapped confirmation has succeeded.
///
/// The wrapped result is returned unchanged. Records are written after the
/// wrapped confirmation has committed; a failed write is logged and counted,
/// and never fails the confirmation.
pub struct ConfirmationInterceptor<C, O, P, L> {
    inner: C,
    orders: O,
    catalog: P,
    sku_logs: L,
    resolver: ComponentResolver,
}

impl<C, O, P, L> ConfirmationInterceptor<C, O, P, L>
where
    C: OrderConfirmation,
    O: SalesOrderReader,
    P: ProductCatalog,
    L: SkuLogStore,
{
    pub fn new(inner: C, orders: O, catalog: P, sku_logs: L, resolver: ComponentResolver) -> Self {
        Self {
            inner,
            orders,
            catalog,
            sku_logs,
            resolver,
        }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn resolver(&self) -> &ComponentResolver {
        &self.resolver
    }

    pub fn confirm_with_summary(
        &self,
        tenant_id: TenantId,
        order_ids: &[SalesOrderId],
    ) -> Result<(C::Output, ComponentLogSummary), C::Error> {
        let output = self.inner.confirm(tenant_id, order_ids)?;
        let summary = self.log_components(tenant_id, order_ids);
        Ok((output, summary))
    }

    fn log_components(&self, tenant_id: TenantId, order_ids: &[SalesOrderId]) -> ComponentLogSummary {
        let mut summary = ComponentLogSummary::default();

        for order_id in distinct(order_ids) {
            let Some(order) = self.orders.order(tenant_id, order_id) else {
                tracing::warn!(order_id = %order_id, "confirmed order not readable; skipping component logging");
                continue;
            };
            summary.orders += 1;

            for line in order.lines() {
                self.log_line(tenant_id, &order, line, &mut summary);
            }
        }

        tracing::debug!(
            orders = summary.orders,
            kit_lines = summary.kit_lines,
            records_written = summary.records_written,
            persistence_failures = summary.persistence_failures,
            "component sku logging finished"
        );
        summary
    }

    fn log_line(&self, tenant_id: TenantId, order: &SalesOrder, line: &OrderLine, summary: &mut ComponentLogSummary) {
        let Some(pack_id) = line.product_id else {
            return;
        };
        summary.lines_inspected += 1;

        let Some(pack) = self.catalog.product(tenant_id, pack_id) else {
            tracing::warn!(order = %order.name(), order_line_id = %line.line_id, product_id = %pack_id, "order line product missing from catalog");
            summary.missing_products += 1;
            return;
        };

        let components = self.resolver.resolve(tenant_id, &pack);
        if components.is_empty() {
            return;
        }
        summary.kit_lines += 1;

        for component_id in components {
            let Some(component) = self.catalog.product(tenant_id, component_id) else {
                tracing::warn!(
                    order = %order.name(),
                    order_line_id = %line.line_id,
                    pack = %pack.display_name(),
                    component_id = %component_id,
                    "kit component missing from catalog"
                );
                summary.missing_products += 1;
                continue;
            };

            let sku = component.sku().to_string();
            let pack_name = pack.display_name();
            let component_name = component.display_name();

            tracing::info!(
                target: SKU_LOG_TARGET,
                order = %order.name(),
                order_line_id = %line.line_id,
                line_no = line.line_no,
                pack = %pack_name,
                component = %component_name,
                sku = %sku,
                "order {} | line {} | pack {} -> component {} (sku: {})",
                order.name(),
                line.line_id,
                pack_name,
                component_name,
                sku,
            );

            let entry = NewSkuLogEntry {
                order_id: order.id_typed(),
                order_line_id: line.line_id,
                pack_product_id: pack_id,
                component_product_id: component_id,
                sku,
                date: None,
            };
            match self.sku_logs.append(tenant_id, entry) {
                Ok(_) => summary.records_written += 1,
                Err(e) => {
                    tracing::warn!(
                        order = %order.name(),
                        order_line_id = %line.line_id,
                        component_id = %component_id,
                        error = %e,
                        "failed to persist component sku record"
                    );
                    summary.persistence_failures += 1;
                }
            }
        }
    }
}

impl<C, O, P, L> OrderConfirmation for ConfirmationInterceptor<C, O, P, L>
where
    C: OrderConfirmation,
    O: SalesOrderReader,
    P: ProductCatalog,
    L: SkuLogStore,
{
    type Output = C::Output;
    type Error = C::Error;

    fn confirm(&self, tenant_id: TenantId, order_ids: &[SalesOrderId]) -> Result<Self::Output, Self::Error> {
        self.confirm_with_summary(tenant_id, order_ids).map(|(output, _)| output)
    }
}
