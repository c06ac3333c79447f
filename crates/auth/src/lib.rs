//! `packtrace-auth`: authorization boundary for the audit tables.
//!
//! Decoupled from transport and storage: callers build a [`Principal`] and ask
//! [`authorize`] whether it holds a [`Permission`] in its active tenant.

pub mod authorize;
pub mod permissions;
pub mod principal;
pub mod roles;

pub use authorize::{authorize, default_role_permissions, AuthzError, Principal};
pub use permissions::Permission;
pub use principal::{PrincipalId, TenantMembership};
pub use roles::Role;
