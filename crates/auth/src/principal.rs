use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use packtrace_core::TenantId;

use crate::{Permission, Role};

/// Identity of an authenticated principal (human user, service account, etc).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrincipalId(Uuid);

impl PrincipalId {
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl core::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for PrincipalId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A principal's membership in a tenant: which roles it holds there and the
/// permissions those roles resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantMembership {
    pub tenant_id: TenantId,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
}

impl TenantMembership {
    /// Build a membership whose permissions come from `role_permissions`.
    pub fn from_roles<F>(tenant_id: TenantId, roles: Vec<Role>, role_permissions: F) -> Self
    where
        F: Fn(&str) -> Vec<Permission>,
    {
        let mut permissions: Vec<Permission> = Vec::new();
        for role in &roles {
            for perm in role_permissions(role.as_str()) {
                if !permissions.contains(&perm) {
                    permissions.push(perm);
                }
            }
        }

        Self {
            tenant_id,
            roles,
            permissions,
        }
    }
}
