// Canonical/SEO resolution across the tenant network.

pub mod canonical;
pub mod handlers;

pub use canonical::{resolve_network, resolve_seo, CanonicalSettings, NetworkSeo, SeoResolution};
