use anyhow::{Context, Result};

use crate::analysis::UniquenessConfig;
use crate::seo::CanonicalSettings;

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// JSON catalog file. The built-in sample catalog is used when unset.
    pub catalog_path: Option<String>,
    pub network_default_domain: String,
    pub url_scheme: String,
    pub uniqueness: UniquenessConfig,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let uniqueness = UniquenessConfig {
            min_word_count: parse_env("UNIQUENESS_MIN_WORDS", 300)?,
            min_generators: parse_env("UNIQUENESS_MIN_GENERATORS", 3)?,
            ..UniquenessConfig::default()
        };

        Ok(Config {
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            catalog_path: std::env::var("CATALOG_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
            network_default_domain: std::env::var("NETWORK_DEFAULT_DOMAIN")
                .unwrap_or_else(|_| "www.example.com".to_string()),
            url_scheme: std::env::var("URL_SCHEME").unwrap_or_else(|_| "https".to_string()),
            uniqueness,
        })
    }

    pub fn canonical_settings(&self) -> CanonicalSettings {
        CanonicalSettings {
            default_domain: self.network_default_domain.clone(),
            scheme: self.url_scheme.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            catalog_path: None,
            network_default_domain: "www.example.com".to_string(),
            url_scheme: "https".to_string(),
            uniqueness: UniquenessConfig::default(),
        }
    }
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_default_and_error() {
        assert_eq!(parse_env::<u16>("SYNDICATION_TEST_UNSET_VAR", 42).unwrap(), 42);

        std::env::set_var("SYNDICATION_TEST_BAD_PORT", "eighty");
        let err = parse_env::<u16>("SYNDICATION_TEST_BAD_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("SYNDICATION_TEST_BAD_PORT"));
        std::env::remove_var("SYNDICATION_TEST_BAD_PORT");
    }

    #[test]
    fn test_canonical_settings_follow_config() {
        let config = Config {
            network_default_domain: "www.network.example".to_string(),
            ..Config::default()
        };
        let settings = config.canonical_settings();
        assert_eq!(settings.default_domain, "www.network.example");
        assert_eq!(settings.scheme, "https");
    }
}
