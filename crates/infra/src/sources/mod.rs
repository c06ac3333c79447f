//! Optional collaborators that know about kit components.
//!
//! The BOM subsystem and the external pack module may or may not be installed.
//! Each is a trait object wired once into [`ComponentSources`]; a missing
//! subsystem is `None`, not a runtime probe. Lookups return `Result`, and the
//! resolver turns every result into a [`SourceOutcome`] so an unavailable source
//! is a recorded outcome rather than a swallowed fault.

pub mod bom;
pub mod pack;

use std::sync::Arc;

use thiserror::Error;

use packtrace_products::ProductId;

pub use bom::{BomSource, StoredBomSource};
pub use pack::{InMemoryPackSource, PackSource};

/// Failure reported by an installed collaborator.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// The current context may not read this source.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// The source is installed but its backend failed.
    #[error("backend failure: {0}")]
    Backend(String),
}

/// Which strategy produced (or failed to produce) components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentSource {
    BillOfMaterials,
    PackLines,
    LocalComponents,
}

impl ComponentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentSource::BillOfMaterials => "bill_of_materials",
            ComponentSource::PackLines => "pack_lines",
            ComponentSource::LocalComponents => "local_components",
        }
    }
}

impl core::fmt::Display for ComponentSource {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of consulting one strategy for one product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// The source answered; the list may be empty and may contain repeats.
    Contributed(Vec<ProductId>),
    /// The subsystem is not installed in this deployment.
    NotInstalled,
    /// The subsystem is installed but the lookup failed.
    Failed(SourceError),
}

impl SourceOutcome {
    pub fn is_available(&self) -> bool {
        matches!(self, SourceOutcome::Contributed(_))
    }

    pub fn components(&self) -> &[ProductId] {
        match self {
            SourceOutcome::Contributed(ids) => ids,
            _ => &[],
        }
    }
}

/// Optional collaborators, resolved once when the resolver is built.
#[derive(Clone, Default)]
pub struct ComponentSources {
    boms: Option<Arc<dyn BomSource>>,
    packs: Option<Arc<dyn PackSource>>,
}

impl ComponentSources {
    /// No optional subsystem installed: only the local relation is used.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn with_boms(mut self, boms: Arc<dyn BomSource>) -> Self {
        self.boms = Some(boms);
        self
    }

    pub fn with_packs(mut self, packs: Arc<dyn PackSource>) -> Self {
        self.packs = Some(packs);
        self
    }

    /// Keep only the collaborators enabled in `config`.
    pub fn from_config(
        config: &crate::config::PackTraceConfig,
        boms: Arc<dyn BomSource>,
        packs: Arc<dyn PackSource>,
    ) -> Self {
        let mut sources = Self::none();
        if config.bom_source {
            sources = sources.with_boms(boms);
        }
        if config.pack_source {
            sources = sources.with_packs(packs);
        }
        sources
    }

    pub fn boms(&self) -> Option<&dyn BomSource> {
        self.boms.as_deref()
    }

    pub fn packs(&self) -> Option<&dyn PackSource> {
        self.packs.as_deref()
    }
}

impl core::fmt::Debug for ComponentSources {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ComponentSources")
            .field("boms", &self.boms.is_some())
            .field("packs", &self.packs.is_some())
            .finish()
    }
}
