//! Canonical / SEO resolution for syndicated content.
//!
//! Every tenant serving a content item declares the same canonical URL: the
//! primary tenant's primary domain plus the primary tenant's slug. Only the
//! primary tenant's rendering is canonical. When the primary tenant cannot be
//! resolved, the URL falls back to the network default domain and the result
//! says why.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::models::content::{ContentItem, TenantOverride};
use crate::models::tenant::{Tenant, TenantRegistry};
use crate::render::format::{excerpt, slugify};
use crate::render::resolver::META_DESCRIPTION_MAX;

/// Network-level settings the resolver needs; sourced from `Config`.
#[derive(Debug, Clone)]
pub struct CanonicalSettings {
    /// Host used when the primary tenant has no usable domain.
    pub default_domain: String,
    pub scheme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DegradedCanonical {
    NoPrimaryTenant,
    PrimaryTenantNotFound { tenant_id: Uuid },
    PrimaryTenantHasNoDomains { tenant_id: Uuid },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SeoResolution {
    pub tenant_id: Uuid,
    pub title: String,
    pub description: String,
    pub intro_body: String,
    /// Slug this tenant serves the item under.
    pub slug: String,
    pub canonical_url: String,
    pub is_canonical: bool,
    /// Set when the canonical URL had to fall back to the network default domain.
    pub degraded: Option<DegradedCanonical>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NetworkSeo {
    pub content_item_id: Uuid,
    pub canonical_url: String,
    pub tenants: Vec<SeoResolution>,
    /// Groups of tenants (two or more) that resolved to the same title.
    pub duplicate_titles: Vec<Vec<Uuid>>,
}

pub fn resolve_seo(
    item: &ContentItem,
    tenant: &Tenant,
    registry: &TenantRegistry,
    settings: &CanonicalSettings,
) -> SeoResolution {
    let (canonical_url, degraded) = canonical_url(item, registry, settings);
    resolve_for_tenant(item, tenant, canonical_url, degraded)
}

fn resolve_for_tenant(
    item: &ContentItem,
    tenant: &Tenant,
    canonical_url: String,
    degraded: Option<DegradedCanonical>,
) -> SeoResolution {
    let is_canonical = item.primary_tenant_id == Some(tenant.id);
    let own = item.tenant_overrides.get(tenant.id);

    let title = own
        .and_then(|o| non_blank(&o.title_override))
        .unwrap_or_else(|| item.title.clone());
    let description = own
        .and_then(|o| non_blank(&o.description_override))
        .or_else(|| non_blank_str(&item.description))
        .unwrap_or_else(|| excerpt(&item.body, META_DESCRIPTION_MAX));
    let intro_body = own
        .and_then(|o| non_blank(&o.intro_override))
        .unwrap_or_else(|| item.body.clone());
    let slug = tenant_slug(item, own);

    SeoResolution {
        tenant_id: tenant.id,
        title,
        description,
        intro_body,
        slug,
        canonical_url,
        is_canonical,
        degraded,
    }
}

/// Resolves every tenant in the registry and flags colliding titles.
pub fn resolve_network(
    item: &ContentItem,
    registry: &TenantRegistry,
    settings: &CanonicalSettings,
) -> NetworkSeo {
    let (canonical_url, degraded) = canonical_url(item, registry, settings);
    let tenants: Vec<SeoResolution> = registry
        .iter()
        .map(|t| resolve_for_tenant(item, t, canonical_url.clone(), degraded.clone()))
        .collect();

    let mut by_title: HashMap<String, Vec<Uuid>> = HashMap::new();
    let mut title_order: Vec<String> = Vec::new();
    for r in &tenants {
        let key = r.title.trim().to_lowercase();
        let entry = by_title.entry(key.clone()).or_default();
        if entry.is_empty() {
            title_order.push(key);
        }
        entry.push(r.tenant_id);
    }
    let duplicate_titles = title_order
        .into_iter()
        .filter_map(|key| by_title.remove(&key))
        .filter(|ids| ids.len() > 1)
        .collect();

    NetworkSeo {
        content_item_id: item.id,
        canonical_url,
        tenants,
        duplicate_titles,
    }
}

fn canonical_url(
    item: &ContentItem,
    registry: &TenantRegistry,
    settings: &CanonicalSettings,
) -> (String, Option<DegradedCanonical>) {
    let prefix = item.kind.path_prefix();

    let primary = match item.primary_tenant_id {
        None => Err(DegradedCanonical::NoPrimaryTenant),
        Some(id) => registry
            .get(id)
            .ok_or(DegradedCanonical::PrimaryTenantNotFound { tenant_id: id }),
    };
    let resolved = primary.and_then(|tenant| {
        tenant
            .primary_domain()
            .map(|domain| (tenant, domain))
            .ok_or(DegradedCanonical::PrimaryTenantHasNoDomains {
                tenant_id: tenant.id,
            })
    });

    match resolved {
        Ok((tenant, domain)) => {
            let slug = tenant_slug(item, item.tenant_overrides.get(tenant.id));
            (build_url(&settings.scheme, domain, prefix, &slug), None)
        }
        Err(reason) => {
            warn!(
                content_item_id = %item.id,
                ?reason,
                fallback_domain = %settings.default_domain,
                "Canonical URL degraded to network default domain"
            );
            let slug = tenant_slug(item, None);
            (
                build_url(&settings.scheme, &settings.default_domain, prefix, &slug),
                Some(reason),
            )
        }
    }
}

/// Custom slug for this tenant when set (normalized), else the item's slug.
fn tenant_slug(item: &ContentItem, own: Option<&TenantOverride>) -> String {
    own.and_then(|o| non_blank(&o.custom_slug))
        .map(|s| slugify(&s))
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| item.slug.clone())
}

fn build_url(scheme: &str, domain: &str, prefix: &str, slug: &str) -> String {
    format!(
        "{scheme}://{}/{prefix}/{}",
        bare_host(domain),
        slug.trim_matches('/')
    )
}

/// Domain as stored by editors, with any scheme or trailing slash removed.
pub fn bare_host(domain: &str) -> &str {
    domain
        .trim()
        .trim_start_matches("https://")
        .trim_start_matches("http://")
        .trim_end_matches('/')
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value.as_deref().and_then(non_blank_str)
}

fn non_blank_str(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;
    use crate::models::content::{ContentKind, TenantOverrides};
    use crate::models::tenant::{TenantDomain, TenantKind};

    fn settings() -> CanonicalSettings {
        CanonicalSettings {
            default_domain: "www.network.example".to_string(),
            scheme: "https".to_string(),
        }
    }

    fn tenant(domain: Option<&str>, kind: TenantKind) -> Tenant {
        Tenant {
            id: Uuid::new_v4(),
            name: "site".to_string(),
            kind,
            domains: domain
                .map(|d| {
                    vec![TenantDomain {
                        domain: d.to_string(),
                        is_primary: true,
                    }]
                })
                .unwrap_or_default(),
        }
    }

    fn item(primary: Option<Uuid>, overrides: Vec<TenantOverride>) -> ContentItem {
        ContentItem {
            id: Uuid::new_v4(),
            kind: ContentKind::Article,
            title: "Spring Market Update".to_string(),
            description: "What changed this spring.".to_string(),
            body: "Inventory rose across the valley.".to_string(),
            slug: "spring-market-update".to_string(),
            primary_tenant_id: primary,
            tenant_overrides: TenantOverrides::try_from(overrides).unwrap(),
        }
    }

    fn network() -> (Tenant, Tenant, Tenant, TenantRegistry) {
        let t0 = tenant(Some("main.example.com"), TenantKind::Main);
        let t1 = tenant(Some("riverton.example.com"), TenantKind::Satellite);
        let t2 = tenant(Some("https://maplefalls.example.com/"), TenantKind::Satellite);
        let registry = TenantRegistry::new(vec![t0.clone(), t1.clone(), t2.clone()]).unwrap();
        (t0, t1, t2, registry)
    }

    #[test]
    fn test_all_tenants_share_one_canonical() {
        let (t0, t1, t2, registry) = network();
        let item = item(
            Some(t0.id),
            vec![TenantOverride {
                tenant_id: t1.id,
                title_override: Some("Riverton Spring Update".to_string()),
                description_override: None,
                intro_override: None,
                custom_slug: Some("Riverton Spring Update".to_string()),
            }],
        );
        let r0 = resolve_seo(&item, &t0, &registry, &settings());
        let r1 = resolve_seo(&item, &t1, &registry, &settings());
        let r2 = resolve_seo(&item, &t2, &registry, &settings());

        assert_eq!(r0.canonical_url, "https://main.example.com/blog/spring-market-update");
        assert_eq!(r1.canonical_url, r0.canonical_url);
        assert_eq!(r2.canonical_url, r0.canonical_url);
        assert!(r0.is_canonical);
        assert!(!r1.is_canonical);
        assert!(!r2.is_canonical);
        assert!(r0.degraded.is_none());
    }

    #[test]
    fn test_overrides_apply_field_by_field() {
        let (t0, t1, _, registry) = network();
        let item = item(
            Some(t0.id),
            vec![TenantOverride {
                tenant_id: t1.id,
                title_override: Some("Riverton Spring Update".to_string()),
                description_override: None,
                intro_override: Some("Riverton saw the biggest jump.".to_string()),
                custom_slug: Some("Riverton Spring Update!".to_string()),
            }],
        );
        let r1 = resolve_seo(&item, &t1, &registry, &settings());
        assert_eq!(r1.title, "Riverton Spring Update");
        assert_eq!(r1.description, "What changed this spring.");
        assert_eq!(r1.intro_body, "Riverton saw the biggest jump.");
        assert_eq!(r1.slug, "riverton-spring-update");
    }

    #[test]
    fn test_no_override_entry_uses_item_defaults() {
        let (t0, _, t2, registry) = network();
        let item = item(Some(t0.id), vec![]);
        let r2 = resolve_seo(&item, &t2, &registry, &settings());
        assert_eq!(r2.title, item.title);
        assert_eq!(r2.slug, item.slug);
        assert_eq!(r2.intro_body, item.body);
    }

    #[test]
    fn test_primary_custom_slug_drives_canonical() {
        let (t0, t1, _, registry) = network();
        let item = item(
            Some(t0.id),
            vec![TenantOverride {
                tenant_id: t0.id,
                title_override: None,
                description_override: None,
                intro_override: None,
                custom_slug: Some("spring-2025".to_string()),
            }],
        );
        let r1 = resolve_seo(&item, &t1, &registry, &settings());
        assert_eq!(r1.canonical_url, "https://main.example.com/blog/spring-2025");
        assert_eq!(r1.slug, "spring-market-update");
    }

    #[test]
    fn test_no_primary_tenant_degrades_to_default_domain() {
        let (_, t1, _, registry) = network();
        let item = item(None, vec![]);
        let r = resolve_seo(&item, &t1, &registry, &settings());
        assert_eq!(r.canonical_url, "https://www.network.example/blog/spring-market-update");
        assert_eq!(r.degraded, Some(DegradedCanonical::NoPrimaryTenant));
        assert!(!r.is_canonical);
    }

    #[test]
    fn test_unknown_primary_tenant_degrades() {
        let (_, t1, _, registry) = network();
        let ghost = Uuid::new_v4();
        let item = item(Some(ghost), vec![]);
        let r = resolve_seo(&item, &t1, &registry, &settings());
        assert_eq!(
            r.degraded,
            Some(DegradedCanonical::PrimaryTenantNotFound { tenant_id: ghost })
        );
        assert!(!r.canonical_url.is_empty());
    }

    #[test]
    fn test_primary_without_domains_degrades() {
        let bare = tenant(None, TenantKind::Main);
        let registry = TenantRegistry::new(vec![bare.clone()]).unwrap();
        let item = item(Some(bare.id), vec![]);
        let r = resolve_seo(&item, &bare, &registry, &settings());
        assert!(r.is_canonical);
        assert_eq!(
            r.degraded,
            Some(DegradedCanonical::PrimaryTenantHasNoDomains { tenant_id: bare.id })
        );
        assert!(r.canonical_url.starts_with("https://www.network.example/"));
    }

    #[test]
    fn test_blank_description_falls_back_to_body_excerpt() {
        let (t0, _, _, registry) = network();
        let mut item = item(Some(t0.id), vec![]);
        item.description = "   ".to_string();
        let r = resolve_seo(&item, &t0, &registry, &settings());
        assert_eq!(r.description, "Inventory rose across the valley.");
    }

    struct CountWarnings(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for CountWarnings {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_degraded_network_warns_once() {
        let (_, _, _, registry) = network();
        let item = item(None, vec![]);
        let warnings = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountWarnings(warnings.clone()));

        let net = tracing::subscriber::with_default(subscriber, || {
            resolve_network(&item, &registry, &settings())
        });

        assert_eq!(warnings.load(Ordering::SeqCst), 1);
        assert_eq!(net.tenants.len(), 3);
        assert!(net
            .tenants
            .iter()
            .all(|r| r.degraded == Some(DegradedCanonical::NoPrimaryTenant)
                && r.canonical_url == net.canonical_url));
    }

    #[test]
    fn test_network_flags_duplicate_titles() {
        let (t0, t1, t2, registry) = network();
        let item = item(
            Some(t0.id),
            vec![TenantOverride {
                tenant_id: t2.id,
                title_override: Some("Maple Falls Spring Update".to_string()),
                description_override: None,
                intro_override: None,
                custom_slug: None,
            }],
        );
        let net = resolve_network(&item, &registry, &settings());
        assert_eq!(net.tenants.len(), 3);
        assert_eq!(net.duplicate_titles, vec![vec![t0.id, t1.id]]);
        assert!(net.tenants.iter().all(|r| r.canonical_url == net.canonical_url));
    }
}
