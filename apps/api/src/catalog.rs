//! Content source: where templates, subjects, localities, tenants, content
//! items and announcements come from.
//!
//! Handlers only see `Arc<dyn ContentSource>`. The in-memory catalog is
//! loaded once at startup, either from a JSON file or from the built-in
//! sample records.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::announcement::{Announcement, AnnouncementScope};
use crate::models::content::{
    ContentItem, ContentKind, OverrideError, TenantOverride, TenantOverrides,
};
use crate::models::locality::LocalityDataset;
use crate::models::subject::SubjectProfile;
use crate::models::template::{CompiledTemplate, TemplateDefinition, TemplateError};
use crate::models::tenant::{RegistryError, Tenant, TenantDomain, TenantKind, TenantRegistry};
use crate::render::sample::{
    default_template, sample_locality, sample_subject, DEFAULT_TEMPLATE_ID, SAMPLE_LOCALITY_ID,
    SAMPLE_STATE_ID, SAMPLE_SUBJECT_ID,
};

#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn template(&self, id: &str) -> Result<CompiledTemplate, AppError>;
    async fn subject(&self, id: Uuid) -> Result<SubjectProfile, AppError>;
    async fn locality(&self, id: Uuid) -> Result<LocalityDataset, AppError>;
    async fn tenants(&self) -> Result<TenantRegistry, AppError>;
    async fn content_item(&self, id: Uuid) -> Result<ContentItem, AppError>;
    async fn announcements(&self) -> Result<Vec<Announcement>, AppError>;
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("catalog is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("template '{template_id}' is misconfigured: {source}")]
    Template {
        template_id: String,
        source: TemplateError,
    },

    #[error("template '{0}' is defined more than once")]
    DuplicateTemplate(String),

    #[error("{kind} {id} is defined more than once")]
    DuplicateRecord { kind: &'static str, id: Uuid },

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Override(#[from] OverrideError),
}

/// On-disk shape of a catalog file. Every collection may be omitted.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CatalogFile {
    pub templates: Vec<TemplateDefinition>,
    pub subjects: Vec<SubjectProfile>,
    pub localities: Vec<LocalityDataset>,
    pub tenants: Vec<Tenant>,
    pub content_items: Vec<ContentItem>,
    pub announcements: Vec<Announcement>,
}

#[derive(Debug, Clone)]
pub struct InMemoryCatalog {
    templates: HashMap<String, CompiledTemplate>,
    subjects: HashMap<Uuid, SubjectProfile>,
    localities: HashMap<Uuid, LocalityDataset>,
    tenants: TenantRegistry,
    content_items: HashMap<Uuid, ContentItem>,
    announcements: Vec<Announcement>,
}

impl InMemoryCatalog {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| CatalogError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let file: CatalogFile = serde_json::from_str(&raw)?;
        let catalog = Self::from_file(file)?;
        info!(path = %path.display(), "Catalog loaded from file");
        Ok(catalog)
    }

    /// Validates and indexes a parsed catalog. Templates are compiled here, so
    /// a misconfigured template is rejected before any request is served.
    pub fn from_file(file: CatalogFile) -> Result<Self, CatalogError> {
        let mut templates = HashMap::with_capacity(file.templates.len() + 1);
        for definition in file.templates {
            let compiled = definition.compile().map_err(|source| CatalogError::Template {
                template_id: definition.id.clone(),
                source,
            })?;
            if templates.contains_key(&compiled.id) {
                return Err(CatalogError::DuplicateTemplate(compiled.id));
            }
            templates.insert(compiled.id.clone(), compiled);
        }
        if !templates.contains_key(DEFAULT_TEMPLATE_ID) {
            let builtin = default_template()
                .compile()
                .map_err(|source| CatalogError::Template {
                    template_id: DEFAULT_TEMPLATE_ID.to_string(),
                    source,
                })?;
            templates.insert(builtin.id.clone(), builtin);
        }

        let catalog = Self {
            templates,
            subjects: index_by_id("subject", file.subjects, |s| s.id)?,
            localities: index_by_id("locality", file.localities, |l| l.id)?,
            tenants: TenantRegistry::new(file.tenants)?,
            content_items: index_by_id("content item", file.content_items, |c| c.id)?,
            announcements: file.announcements,
        };
        catalog.log_summary();
        Ok(catalog)
    }

    /// Catalog seeded with the sample subject and locality, a two-site
    /// network and a few announcements.
    pub fn sample() -> Result<Self, CatalogError> {
        let main_site = Tenant {
            id: SAMPLE_MAIN_TENANT_ID,
            name: "Avery Realty Group".to_string(),
            kind: TenantKind::Main,
            domains: vec![TenantDomain {
                domain: "www.averyrealty.example.com".to_string(),
                is_primary: true,
            }],
        };
        let satellite = Tenant {
            id: SAMPLE_SATELLITE_TENANT_ID,
            name: "Maple Falls Homes".to_string(),
            kind: TenantKind::Satellite,
            domains: vec![TenantDomain {
                domain: "maplefallshomes.example.com".to_string(),
                is_primary: true,
            }],
        };
        let article = ContentItem {
            id: SAMPLE_CONTENT_ITEM_ID,
            kind: ContentKind::Article,
            title: "Maple Falls Spring Market Update".to_string(),
            description: "Prices, inventory and where buyers are looking this spring.".to_string(),
            body: "Inventory in Maple Falls rose through March while prices held steady."
                .to_string(),
            slug: "maple-falls-spring-market-update".to_string(),
            primary_tenant_id: Some(SAMPLE_MAIN_TENANT_ID),
            tenant_overrides: TenantOverrides::try_from(vec![TenantOverride {
                tenant_id: SAMPLE_SATELLITE_TENANT_ID,
                title_override: Some(
                    "Spring 2025 in Maple Falls: What Buyers Should Know".to_string(),
                ),
                description_override: None,
                intro_override: None,
                custom_slug: Some("spring-buyers-guide".to_string()),
            }])?,
        };
        let announcements = vec![
            Announcement {
                id: Uuid::from_u128(0x5a11_0000_0000_4000_8000_0000_0000_0a01),
                title: "Free home valuation this month".to_string(),
                excerpt: "Find out what your home is worth in today's market.".to_string(),
                cta_text: Some("Request a valuation".to_string()),
                cta_link: Some("https://www.averyrealty.example.com/valuation".to_string()),
                scope: AnnouncementScope::Global,
                target_state_ids: vec![],
                target_city_ids: vec![],
                target_subject_ids: vec![],
                exclude_subject_ids: vec![],
                priority: 1,
                start_date: None,
                end_date: None,
                is_active: true,
            },
            Announcement {
                id: Uuid::from_u128(0x5a11_0000_0000_4000_8000_0000_0000_0a02),
                title: "Harvest Lantern Walk open houses".to_string(),
                excerpt: "Tour Old Town listings during the October festival.".to_string(),
                cta_text: None,
                cta_link: None,
                scope: AnnouncementScope::City,
                target_state_ids: vec![],
                target_city_ids: vec![SAMPLE_LOCALITY_ID],
                target_subject_ids: vec![],
                exclude_subject_ids: vec![],
                priority: 5,
                start_date: None,
                end_date: None,
                is_active: true,
            },
            Announcement {
                id: Uuid::from_u128(0x5a11_0000_0000_4000_8000_0000_0000_0a03),
                title: "Oregon first-time buyer grants".to_string(),
                excerpt: "State programs can cover part of your down payment.".to_string(),
                cta_text: None,
                cta_link: None,
                scope: AnnouncementScope::State,
                target_state_ids: vec![SAMPLE_STATE_ID],
                target_city_ids: vec![],
                target_subject_ids: vec![],
                exclude_subject_ids: vec![SAMPLE_SUBJECT_ID],
                priority: 3,
                start_date: None,
                end_date: None,
                is_active: true,
            },
        ];

        Self::from_file(CatalogFile {
            templates: vec![default_template()],
            subjects: vec![sample_subject()],
            localities: vec![sample_locality()],
            tenants: vec![main_site, satellite],
            content_items: vec![article],
            announcements,
        })
    }

    fn log_summary(&self) {
        info!(
            templates = self.templates.len(),
            subjects = self.subjects.len(),
            localities = self.localities.len(),
            tenants = self.tenants.len(),
            content_items = self.content_items.len(),
            announcements = self.announcements.len(),
            "Catalog ready"
        );
        if self.tenants.is_empty() && !self.content_items.is_empty() {
            warn!("Catalog has content items but no tenants; canonical URLs will be degraded");
        }
    }
}

pub const SAMPLE_MAIN_TENANT_ID: Uuid = Uuid::from_u128(0x5a11_0000_0000_4000_8000_0000_0000_0101);
pub const SAMPLE_SATELLITE_TENANT_ID: Uuid =
    Uuid::from_u128(0x5a11_0000_0000_4000_8000_0000_0000_0102);
pub const SAMPLE_CONTENT_ITEM_ID: Uuid = Uuid::from_u128(0x5a11_0000_0000_4000_8000_0000_0000_0201);

fn index_by_id<T>(
    kind: &'static str,
    records: Vec<T>,
    id_of: impl Fn(&T) -> Uuid,
) -> Result<HashMap<Uuid, T>, CatalogError> {
    let mut map = HashMap::with_capacity(records.len());
    for record in records {
        let id = id_of(&record);
        if map.insert(id, record).is_some() {
            return Err(CatalogError::DuplicateRecord { kind, id });
        }
    }
    Ok(map)
}

#[async_trait]
impl ContentSource for InMemoryCatalog {
    async fn template(&self, id: &str) -> Result<CompiledTemplate, AppError> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("template '{id}'")))
    }

    async fn subject(&self, id: Uuid) -> Result<SubjectProfile, AppError> {
        self.subjects
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("subject {id}")))
    }

    async fn locality(&self, id: Uuid) -> Result<LocalityDataset, AppError> {
        self.localities
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("locality {id}")))
    }

    async fn tenants(&self) -> Result<TenantRegistry, AppError> {
        Ok(self.tenants.clone())
    }

    async fn content_item(&self, id: Uuid) -> Result<ContentItem, AppError> {
        self.content_items
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("content item {id}")))
    }

    async fn announcements(&self) -> Result<Vec<Announcement>, AppError> {
        Ok(self.announcements.clone())
    }
}
