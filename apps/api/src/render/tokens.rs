//! The closed set of `{{TOKEN}}` placeholders literal sections may use.

use serde::Serialize;

use crate::models::locality::LocalityDataset;
use crate::models::subject::SubjectProfile;
use crate::render::format::{currency, group_thousands, signed_percent};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    SubjectName,
    DisplayName,
    Designation,
    SubjectPhone,
    SubjectEmail,
    SubjectWebsite,
    CityName,
    StateName,
    Population,
    MedianPrice,
    PriceTrend,
    InventoryLevel,
    NeighborhoodCount,
    TopNeighborhood,
    TopSchool,
    TopEmployer,
    BaseUrl,
}

impl Token {
    pub const ALL: &'static [Token] = &[
        Token::SubjectName,
        Token::DisplayName,
        Token::Designation,
        Token::SubjectPhone,
        Token::SubjectEmail,
        Token::SubjectWebsite,
        Token::CityName,
        Token::StateName,
        Token::Population,
        Token::MedianPrice,
        Token::PriceTrend,
        Token::InventoryLevel,
        Token::NeighborhoodCount,
        Token::TopNeighborhood,
        Token::TopSchool,
        Token::TopEmployer,
        Token::BaseUrl,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Token::SubjectName => "SUBJECT_NAME",
            Token::DisplayName => "DISPLAY_NAME",
            Token::Designation => "DESIGNATION",
            Token::SubjectPhone => "SUBJECT_PHONE",
            Token::SubjectEmail => "SUBJECT_EMAIL",
            Token::SubjectWebsite => "SUBJECT_WEBSITE",
            Token::CityName => "CITY_NAME",
            Token::StateName => "STATE_NAME",
            Token::Population => "POPULATION",
            Token::MedianPrice => "MEDIAN_PRICE",
            Token::PriceTrend => "PRICE_TREND",
            Token::InventoryLevel => "INVENTORY_LEVEL",
            Token::NeighborhoodCount => "NEIGHBORHOOD_COUNT",
            Token::TopNeighborhood => "TOP_NEIGHBORHOOD",
            Token::TopSchool => "TOP_SCHOOL",
            Token::TopEmployer => "TOP_EMPLOYER",
            Token::BaseUrl => "BASE_URL",
        }
    }

    pub fn from_name(name: &str) -> Option<Token> {
        Token::ALL.iter().copied().find(|t| t.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Token::SubjectName => "Subject's full name",
            Token::DisplayName => "Subject's display name, or full name when unset",
            Token::Designation => "Subject's professional designation",
            Token::SubjectPhone => "Subject's phone number",
            Token::SubjectEmail => "Subject's email address",
            Token::SubjectWebsite => "Subject's website",
            Token::CityName => "Locality name",
            Token::StateName => "State the locality belongs to",
            Token::Population => "Locality population, comma grouped",
            Token::MedianPrice => "Median home price, e.g. $425,000",
            Token::PriceTrend => "Year-over-year price change, e.g. +4.2%",
            Token::InventoryLevel => "Inventory level: low, balanced or high",
            Token::NeighborhoodCount => "Number of neighborhoods on record",
            Token::TopNeighborhood => "Highest-priced neighborhood",
            Token::TopSchool => "Highest-rated school",
            Token::TopEmployer => "First listed key employer",
            Token::BaseUrl => "Base URL of the serving site",
        }
    }

    /// The token's value for this context, or `None` when the field is absent.
    pub fn value(
        &self,
        subject: &SubjectProfile,
        locality: &LocalityDataset,
        base_url: &str,
    ) -> Option<String> {
        let non_blank = |s: &Option<String>| {
            s.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(String::from)
        };
        match self {
            Token::SubjectName => Some(subject.name.clone()),
            Token::DisplayName => Some(subject.display().to_string()),
            Token::Designation => non_blank(&subject.designation),
            Token::SubjectPhone => non_blank(&subject.phone),
            Token::SubjectEmail => non_blank(&subject.email),
            Token::SubjectWebsite => non_blank(&subject.website),
            Token::CityName => Some(locality.name.clone()),
            Token::StateName => non_blank(&locality.state_name),
            Token::Population => locality.population.map(group_thousands),
            Token::MedianPrice => locality.median_price.map(currency),
            Token::PriceTrend => locality.price_trend_pct.map(signed_percent),
            Token::InventoryLevel => locality.inventory_level.map(|l| l.as_str().to_string()),
            Token::NeighborhoodCount => {
                let count = locality.neighborhoods.len();
                (count > 0).then(|| count.to_string())
            }
            Token::TopNeighborhood => locality.top_neighborhood().map(|n| n.name.clone()),
            Token::TopSchool => locality.top_school().map(|s| s.name.clone()),
            Token::TopEmployer => locality.employers.first().cloned(),
            Token::BaseUrl => {
                let trimmed = base_url.trim().trim_end_matches('/');
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
        }
    }
}

/// Listing entry for the authoring tool.
#[derive(Debug, Clone, Serialize)]
pub struct TokenInfo {
    pub token: String,
    pub description: &'static str,
}

pub fn token_catalog() -> Vec<TokenInfo> {
    Token::ALL
        .iter()
        .map(|t| TokenInfo {
            token: format!("{{{{{}}}}}", t.name()),
            description: t.description(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::sample::{sample_locality, sample_subject};

    #[test]
    fn test_names_round_trip() {
        for token in Token::ALL {
            assert_eq!(Token::from_name(token.name()), Some(*token));
        }
        assert_eq!(Token::from_name("city_name"), None);
    }

    #[test]
    fn test_values_from_sample() {
        let subject = sample_subject();
        let locality = sample_locality();
        let value = |t: Token| t.value(&subject, &locality, "https://riverton.example.com/");
        assert_eq!(value(Token::CityName).as_deref(), Some(locality.name.as_str()));
        assert_eq!(value(Token::MedianPrice).as_deref(), Some("$412,500"));
        assert_eq!(
            value(Token::BaseUrl).as_deref(),
            Some("https://riverton.example.com")
        );
    }

    #[test]
    fn test_absent_fields_have_no_value() {
        let mut subject = sample_subject();
        subject.phone = Some("  ".to_string());
        let mut locality = sample_locality();
        locality.median_price = None;
        locality.neighborhoods.clear();
        assert_eq!(Token::SubjectPhone.value(&subject, &locality, ""), None);
        assert_eq!(Token::MedianPrice.value(&subject, &locality, ""), None);
        assert_eq!(Token::NeighborhoodCount.value(&subject, &locality, ""), None);
        assert_eq!(Token::BaseUrl.value(&subject, &locality, " "), None);
    }

    #[test]
    fn test_catalog_lists_every_token() {
        let catalog = token_catalog();
        assert_eq!(catalog.len(), Token::ALL.len());
        assert_eq!(catalog[0].token, "{{SUBJECT_NAME}}");
    }
}
