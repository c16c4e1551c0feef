use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    Article,
    Designation,
    Announcement,
}

impl ContentKind {
    /// Path segment the public sites mount this kind of content under.
    pub fn path_prefix(&self) -> &'static str {
        match self {
            ContentKind::Article => "blog",
            ContentKind::Designation => "designations",
            ContentKind::Announcement => "announcements",
        }
    }
}

/// Per-tenant replacement of an item's SEO-facing fields.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TenantOverride {
    pub tenant_id: Uuid,
    pub title_override: Option<String>,
    pub description_override: Option<String>,
    pub intro_override: Option<String>,
    pub custom_slug: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum OverrideError {
    #[error("tenant {0} has more than one override entry")]
    DuplicateTenant(Uuid),

    #[error("section '{0}' has more than one override")]
    DuplicateSection(String),
}

/// Tenant overrides keyed by tenant id. Deserializes from a list and refuses
/// lists that name a tenant twice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(try_from = "Vec<TenantOverride>", into = "Vec<TenantOverride>")]
pub struct TenantOverrides(HashMap<Uuid, TenantOverride>);

impl TenantOverrides {
    pub fn get(&self, tenant_id: Uuid) -> Option<&TenantOverride> {
        self.0.get(&tenant_id)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl TryFrom<Vec<TenantOverride>> for TenantOverrides {
    type Error = OverrideError;

    fn try_from(entries: Vec<TenantOverride>) -> Result<Self, Self::Error> {
        let mut map = HashMap::with_capacity(entries.len());
        for entry in entries {
            let tenant_id = entry.tenant_id;
            if map.insert(tenant_id, entry).is_some() {
                return Err(OverrideError::DuplicateTenant(tenant_id));
            }
        }
        Ok(Self(map))
    }
}

impl From<TenantOverrides> for Vec<TenantOverride> {
    fn from(overrides: TenantOverrides) -> Self {
        let mut entries: Vec<_> = overrides.0.into_values().collect();
        entries.sort_by_key(|e| e.tenant_id);
        entries
    }
}

/// An authored item syndicated across tenants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentItem {
    pub id: Uuid,
    pub kind: ContentKind,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub body: String,
    pub slug: String,
    /// Owner of the canonical URL.
    pub primary_tenant_id: Option<Uuid>,
    #[serde(default)]
    pub tenant_overrides: TenantOverrides,
}

/// Editor-supplied replacement bodies keyed by section id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionOverrides(HashMap<String, String>);

impl SectionOverrides {
    pub fn from_entries<I>(entries: I) -> Result<Self, OverrideError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut map = HashMap::new();
        for (section_id, body) in entries {
            if map.contains_key(&section_id) {
                return Err(OverrideError::DuplicateSection(section_id));
            }
            map.insert(section_id, body);
        }
        Ok(Self(map))
    }

    pub fn get(&self, section_id: &str) -> Option<&str> {
        self.0.get(section_id).map(String::as_str)
    }

    pub fn section_ids(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<HashMap<String, String>> for SectionOverrides {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map)
    }
}
