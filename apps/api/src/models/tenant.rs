use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TenantKind {
    Main,
    Satellite,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantDomain {
    pub domain: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// One published site identity in the network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub name: String,
    pub kind: TenantKind,
    #[serde(default)]
    pub domains: Vec<TenantDomain>,
}

impl Tenant {
    /// The domain canonical URLs are built on.
    ///
    /// A tenant with no domain marked primary falls back to its first listed
    /// domain; that fallback is logged so it never passes unnoticed.
    pub fn primary_domain(&self) -> Option<&str> {
        if let Some(d) = self.domains.iter().find(|d| d.is_primary) {
            return Some(d.domain.as_str());
        }
        let first = self.domains.first()?;
        warn!(
            tenant_id = %self.id,
            domain = %first.domain,
            "Tenant has no primary domain marked; using first listed domain"
        );
        Some(first.domain.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("tenant {0} is registered more than once")]
    DuplicateTenant(Uuid),

    #[error("tenant {0} marks more than one domain as primary")]
    MultiplePrimaryDomains(Uuid),
}

/// All tenants in the network, keyed by id. Built once; lookups never filter.
/// At most one domain per tenant may be marked primary.
#[derive(Debug, Clone, Default)]
pub struct TenantRegistry {
    tenants: Vec<Tenant>,
    by_id: HashMap<Uuid, usize>,
}

impl TenantRegistry {
    pub fn new(tenants: Vec<Tenant>) -> Result<Self, RegistryError> {
        let mut by_id = HashMap::with_capacity(tenants.len());
        for (idx, tenant) in tenants.iter().enumerate() {
            if by_id.insert(tenant.id, idx).is_some() {
                return Err(RegistryError::DuplicateTenant(tenant.id));
            }
            if tenant.domains.iter().filter(|d| d.is_primary).count() > 1 {
                return Err(RegistryError::MultiplePrimaryDomains(tenant.id));
            }
        }
        Ok(Self { tenants, by_id })
    }

    pub fn get(&self, id: Uuid) -> Option<&Tenant> {
        self.by_id.get(&id).map(|&idx| &self.tenants[idx])
    }

    /// Tenants in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Tenant> {
        self.tenants.iter()
    }

    pub fn len(&self) -> usize {
        self.tenants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tenants.is_empty()
    }
}
