//! Synthetic sample data used when a render request names no subject or
//! locality, so editors can preview a template without real records.
//!
//! The sample ids are fixed so previews are reproducible.

use uuid::Uuid;

use crate::models::locality::{
    CommunityAmenity, DemographicGroup, Demographics, InventoryLevel, LocalityDataset,
    Neighborhood, PlaceOfWorship, School, SchoolKind,
};
use crate::models::subject::SubjectProfile;
use crate::models::template::{
    LocalityCollection, SectionCondition, SectionDefinition, SectionKind, SectionRole,
    TemplateDefinition,
};

pub const SAMPLE_SUBJECT_ID: Uuid = Uuid::from_u128(0x5a11_0000_0000_4000_8000_0000_0000_0001);
pub const SAMPLE_LOCALITY_ID: Uuid = Uuid::from_u128(0x5a11_0000_0000_4000_8000_0000_0000_0002);
pub const SAMPLE_STATE_ID: Uuid = Uuid::from_u128(0x5a11_0000_0000_4000_8000_0000_0000_0003);
pub const DEFAULT_TEMPLATE_ID: &str = "subject-locality-profile";

pub fn sample_subject() -> SubjectProfile {
    SubjectProfile {
        id: SAMPLE_SUBJECT_ID,
        name: "Jordan Avery".to_string(),
        display_name: Some("Jordan Avery".to_string()),
        designation: Some("Certified Residential Specialist".to_string()),
        city_id: Some(SAMPLE_LOCALITY_ID),
        state_id: Some(SAMPLE_STATE_ID),
        phone: Some("(555) 010-4477".to_string()),
        email: Some("jordan.avery@example.com".to_string()),
        website: Some("https://jordanavery.example.com".to_string()),
        bio: Some(
            "Jordan grew up along the Cedar River and has spent twelve years helping \
             families settle into Maple Falls."
                .to_string(),
        ),
    }
}

pub fn sample_locality() -> LocalityDataset {
    LocalityDataset {
        id: SAMPLE_LOCALITY_ID,
        name: "Maple Falls".to_string(),
        state_id: Some(SAMPLE_STATE_ID),
        state_name: Some("Oregon".to_string()),
        population: Some(48_210),
        median_price: Some(412_500),
        price_trend_pct: Some(3.8),
        inventory_level: Some(InventoryLevel::Balanced),
        neighborhoods: vec![
            Neighborhood {
                name: "Cedar Bluff".to_string(),
                median_price: Some(465_000),
                description: Some(
                    "tree-lined streets above the river with craftsman bungalows".to_string(),
                ),
            },
            Neighborhood {
                name: "Old Town".to_string(),
                median_price: Some(389_000),
                description: Some("walkable blocks around the 1890s depot".to_string()),
            },
            Neighborhood {
                name: "Willow Creek".to_string(),
                median_price: None,
                description: None,
            },
        ],
        schools: vec![
            School {
                name: "Maple Falls High".to_string(),
                rating: Some(8.5),
                kind: SchoolKind::High,
            },
            School {
                name: "Riverbend Elementary".to_string(),
                rating: Some(9.1),
                kind: SchoolKind::Elementary,
            },
        ],
        facts: vec![
            "The Maple Falls covered bridge dates to 1911".to_string(),
            "Every October the Harvest Lantern Walk draws visitors from across the valley"
                .to_string(),
        ],
        employers: vec![
            "Cascade Regional Medical Center".to_string(),
            "Maple Falls School District".to_string(),
            "Northfork Timber Cooperative".to_string(),
        ],
        demographics: Some(Demographics {
            median_age: Some(38.4),
            median_household_income: Some(71_200),
            groups: vec![
                DemographicGroup {
                    label: "White".to_string(),
                    share_pct: 61.0,
                },
                DemographicGroup {
                    label: "Hispanic or Latino".to_string(),
                    share_pct: 22.5,
                },
                DemographicGroup {
                    label: "Asian".to_string(),
                    share_pct: 9.0,
                },
            ],
        }),
        places_of_worship: vec![
            PlaceOfWorship {
                name: "St. Brendan Parish".to_string(),
                denomination: Some("Catholic".to_string()),
            },
            PlaceOfWorship {
                name: "Cedar River Friends Meeting".to_string(),
                denomination: Some("Quaker".to_string()),
            },
        ],
        community_amenities: vec![
            CommunityAmenity {
                name: "Falls Overlook Park".to_string(),
                category: Some("park".to_string()),
            },
            CommunityAmenity {
                name: "Maple Falls Public Library".to_string(),
                category: Some("library".to_string()),
            },
        ],
    }
}

fn literal(id: &str, name: &str, role: SectionRole, body: &str) -> SectionDefinition {
    SectionDefinition {
        id: id.to_string(),
        name: name.to_string(),
        kind: SectionKind::Literal,
        role,
        literal_body: Some(body.to_string()),
        generator: None,
        condition: None,
    }
}

fn dynamic(id: &str, generator: &str, condition: SectionCondition) -> SectionDefinition {
    SectionDefinition {
        id: id.to_string(),
        name: id.replace('_', " "),
        kind: SectionKind::Dynamic,
        role: SectionRole::Body,
        literal_body: None,
        generator: Some(generator.to_string()),
        condition: Some(condition),
    }
}

/// Built-in profile template used when a render request names none.
pub fn default_template() -> TemplateDefinition {
    let min = |collection| SectionCondition::MinEntries { collection, min: 1 };
    TemplateDefinition {
        id: DEFAULT_TEMPLATE_ID.to_string(),
        name: Some("Subject locality profile".to_string()),
        sections: vec![
            literal(
                "title",
                "Page title",
                SectionRole::Title,
                "{{DISPLAY_NAME}} | Homes for sale in {{CITY_NAME}}, {{STATE_NAME}}",
            ),
            literal(
                "meta_description",
                "Meta description",
                SectionRole::Description,
                "Explore {{CITY_NAME}} with {{DISPLAY_NAME}}: neighborhoods, schools and a \
                 median home price of {{MEDIAN_PRICE}}.",
            ),
            literal(
                "intro",
                "Introduction",
                SectionRole::Body,
                "Thinking about a move to {{CITY_NAME}}? This guide walks through what life \
                 there looks like and how {{DISPLAY_NAME}} can help.",
            ),
            dynamic("subject_introduction", "subject_introduction", SectionCondition::Always),
            dynamic("market_snapshot", "market_snapshot", SectionCondition::HasMarketData),
            dynamic(
                "neighborhood_spotlight",
                "neighborhood_spotlight",
                min(LocalityCollection::Neighborhoods),
            ),
            dynamic("school_overview", "school_overview", min(LocalityCollection::Schools)),
            dynamic("diversity_overview", "diversity_overview", SectionCondition::HasDemographics),
            dynamic(
                "community_amenities",
                "community_amenities",
                min(LocalityCollection::CommunityAmenities),
            ),
            dynamic(
                "places_of_worship",
                "places_of_worship",
                min(LocalityCollection::PlacesOfWorship),
            ),
            dynamic("local_economy", "local_economy", min(LocalityCollection::Employers)),
            dynamic("city_facts", "city_facts", min(LocalityCollection::Facts)),
            literal(
                "closing",
                "Closing",
                SectionRole::Body,
                "Ready to take the next step? Call {{SUBJECT_PHONE}} or visit {{BASE_URL}} \
                 to get started.",
            ),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_template_compiles() {
        let compiled = default_template().compile().unwrap();
        assert_eq!(compiled.id, DEFAULT_TEMPLATE_ID);
        assert!(compiled.has_role(SectionRole::Title));
        assert!(compiled.has_role(SectionRole::Description));
    }

    #[test]
    fn test_sample_subject_lives_in_sample_locality() {
        assert_eq!(sample_subject().city_id, Some(sample_locality().id));
    }
}
