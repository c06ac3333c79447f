use thiserror::Error;

use packtrace_core::TenantId;

use crate::{Permission, PrincipalId, TenantMembership};

/// A fully resolved principal for authorization decisions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub principal_id: PrincipalId,
    pub active_tenant_id: TenantId,
    pub membership: TenantMembership,
}

impl Principal {
    /// Principal acting in the tenant of its membership.
    pub fn new(principal_id: PrincipalId, membership: TenantMembership) -> Self {
        Self {
            principal_id,
            active_tenant_id: membership.tenant_id,
            membership,
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("tenant mismatch")]
    TenantMismatch,

    #[error("forbidden: missing permission '{0}'")]
    Forbidden(String),
}

/// Authorize a principal within its active tenant context.
///
/// Pure policy check: no IO, no panics.
pub fn authorize(principal: &Principal, required: &Permission) -> Result<(), AuthzError> {
    if principal.active_tenant_id != principal.membership.tenant_id {
        return Err(AuthzError::TenantMismatch);
    }

    let granted = principal
        .membership
        .permissions
        .iter()
        .any(|p| p.is_wildcard() || p == required);

    if granted {
        Ok(())
    } else {
        Err(AuthzError::Forbidden(required.as_str().to_string()))
    }
}

/// Default role → permission policy.
pub fn default_role_permissions(role: &str) -> Vec<Permission> {
    match role {
        "admin" => vec![Permission::WILDCARD],
        "manager" => vec![
            Permission::SALES_READ,
            Permission::SALES_WRITE,
            Permission::SKU_LOGS_READ,
        ],
        "auditor" => vec![Permission::SALES_READ, Permission::SKU_LOGS_READ],
        "salesperson" => vec![Permission::SALES_READ, Permission::SALES_WRITE],
        _ => vec![],
    }
}
