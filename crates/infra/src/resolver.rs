//! Kit component resolution.
//!
//! A product is a pack/kit when at least one strategy finds components for it:
//!
//! 1. phantom bills of materials (variant match first, template match as fallback)
//! 2. pack lines from the external pack module (variant first, then template)
//! 3. the local `component_ids` relation
//!
//! All strategies run; their results are unioned by product identity.

use std::collections::HashSet;

use packtrace_core::TenantId;
use packtrace_products::{Product, ProductId};

use crate::sources::{ComponentSource, ComponentSources, SourceOutcome};

/// Distinct component products of a kit. Iteration order is unspecified.
pub type ComponentSet = HashSet<ProductId>;

/// What one strategy did for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyReport {
    pub source: ComponentSource,
    pub outcome: SourceOutcome,
}

/// Components found for a product plus the per-strategy trail.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    components: ComponentSet,
    reports: Vec<StrategyReport>,
}

impl Resolution {
    pub fn components(&self) -> &ComponentSet {
        &self.components
    }

    pub fn into_components(self) -> ComponentSet {
        self.components
    }

    pub fn reports(&self) -> &[StrategyReport] {
        &self.reports
    }

    pub fn report(&self, source: ComponentSource) -> Option<&SourceOutcome> {
        self.reports.iter().find(|r| r.source == source).map(|r| &r.outcome)
    }

    /// An empty resolution means "not a kit".
    pub fn is_kit(&self) -> bool {
        !self.components.is_empty()
    }
}

/// Resolves the component products of a product.
///
/// Never fails: an optional source that is missing or errors contributes
/// nothing, and the outcome is kept in the [`Resolution`].
#[derive(Debug, Clone, Default)]
pub struct ComponentResolver {
    sources: ComponentSources,
}

impl ComponentResolver {
    pub fn new(sources: ComponentSources) -> Self {
        Self { sources }
    }

    pub fn sources(&self) -> &ComponentSources {
        &self.sources
    }

    pub fn resolve(&self, tenant_id: TenantId, product: &Product) -> ComponentSet {
        self.resolve_detailed(tenant_id, product).into_components()
    }

    pub fn resolve_detailed(&self, tenant_id: TenantId, product: &Product) -> Resolution {
        let reports = vec![
            StrategyReport {
                source: ComponentSource::BillOfMaterials,
                outcome: self.from_boms(tenant_id, product),
            },
            StrategyReport {
                source: ComponentSource::PackLines,
                outcome: self.from_pack_lines(tenant_id, product),
            },
            StrategyReport {
                source: ComponentSource::LocalComponents,
                outcome: SourceOutcome::Contributed(product.component_ids().to_vec()),
            },
        ];

        let mut components = ComponentSet::new();
        for report in &reports {
            match &report.outcome {
                SourceOutcome::Contributed(ids) => components.extend(ids.iter().copied()),
                SourceOutcome::NotInstalled => {
                    tracing::debug!(
                        product_id = %product.id_typed(),
                        source = %report.source,
                        "component source not installed"
                    );
                }
                SourceOutcome::Failed(err) => {
                    tracing::debug!(
                        product_id = %product.id_typed(),
                        source = %report.source,
                        error = %err,
                        "component source unavailable; skipping"
                    );
                }
            }
        }

        Resolution { components, reports }
    }

    fn from_boms(&self, tenant_id: TenantId, product: &Product) -> SourceOutcome {
        let Some(boms) = self.sources.boms() else {
            return SourceOutcome::NotInstalled;
        };

        let variant = match boms.phantom_boms_for_variant(tenant_id, product.id_typed()) {
            Ok(found) => found,
            Err(e) => return SourceOutcome::Failed(e),
        };

        // Template-level BOMs are a fallback, never added on top of variant BOMs.
        let matched = if variant.is_empty() {
            match boms.phantom_boms_for_template(tenant_id, product.template_id()) {
                Ok(found) => found,
                Err(e) => return SourceOutcome::Failed(e),
            }
        } else {
            variant
        };

        SourceOutcome::Contributed(matched.iter().flat_map(|b| b.component_ids()).collect())
    }

    fn from_pack_lines(&self, tenant_id: TenantId, product: &Product) -> SourceOutcome {
        let Some(packs) = self.sources.packs() else {
            return SourceOutcome::NotInstalled;
        };

        let lines = match packs.variant_pack_lines(tenant_id, product.id_typed()) {
            Ok(Some(lines)) => lines,
            Ok(None) => match packs.template_pack_lines(tenant_id, product.template_id()) {
                Ok(lines) => lines.unwrap_or_default(),
                Err(e) => return SourceOutcome::Failed(e),
            },
            Err(e) => return SourceOutcome::Failed(e),
        };

        SourceOutcome::Contributed(lines.iter().filter_map(|l| l.product_id).collect())
    }
}
