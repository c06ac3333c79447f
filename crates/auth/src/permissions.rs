use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Permission identifier.
///
/// Permissions are opaque strings (e.g. "sales.read"). The wildcard `"*"`
/// grants everything within the tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permission(Cow<'static, str>);

impl Permission {
    pub const WILDCARD: Permission = Permission(Cow::Borrowed("*"));

    /// Read the component SKU audit table. There is no write counterpart:
    /// records are only created by confirmation and only removed with their
    /// order or order line.
    pub const SKU_LOGS_READ: Permission = Permission(Cow::Borrowed("sku_logs.read"));

    pub const SALES_READ: Permission = Permission(Cow::Borrowed("sales.read"));
    pub const SALES_WRITE: Permission = Permission(Cow::Borrowed("sales.write"));

    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_wildcard(&self) -> bool {
        self.as_str() == "*"
    }
}

impl core::fmt::Display for Permission {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}
