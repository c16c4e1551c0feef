use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InventoryLevel {
    Low,
    Balanced,
    High,
}

impl InventoryLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryLevel::Low => "low",
            InventoryLevel::Balanced => "balanced",
            InventoryLevel::High => "high",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neighborhood {
    pub name: String,
    pub median_price: Option<u64>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SchoolKind {
    Elementary,
    Middle,
    High,
    Private,
    Charter,
}

impl SchoolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolKind::Elementary => "elementary",
            SchoolKind::Middle => "middle",
            SchoolKind::High => "high",
            SchoolKind::Private => "private",
            SchoolKind::Charter => "charter",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    /// 1–10 rating from the locality data provider.
    pub rating: Option<f32>,
    pub kind: SchoolKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemographicGroup {
    pub label: String,
    pub share_pct: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Demographics {
    pub median_age: Option<f64>,
    pub median_household_income: Option<u64>,
    #[serde(default)]
    pub groups: Vec<DemographicGroup>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaceOfWorship {
    pub name: String,
    pub denomination: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommunityAmenity {
    pub name: String,
    pub category: Option<String>,
}

/// Facts about one geography. Referenced by renders, never owned by them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalityDataset {
    pub id: Uuid,
    pub name: String,
    pub state_id: Option<Uuid>,
    pub state_name: Option<String>,
    pub population: Option<u64>,
    pub median_price: Option<u64>,
    /// Year-over-year median price change in percent (negative = falling).
    pub price_trend_pct: Option<f64>,
    pub inventory_level: Option<InventoryLevel>,
    #[serde(default)]
    pub neighborhoods: Vec<Neighborhood>,
    #[serde(default)]
    pub schools: Vec<School>,
    #[serde(default)]
    pub facts: Vec<String>,
    #[serde(default)]
    pub employers: Vec<String>,
    pub demographics: Option<Demographics>,
    #[serde(default)]
    pub places_of_worship: Vec<PlaceOfWorship>,
    #[serde(default)]
    pub community_amenities: Vec<CommunityAmenity>,
}

impl LocalityDataset {
    pub fn has_market_data(&self) -> bool {
        self.median_price.is_some() || self.price_trend_pct.is_some()
    }

    /// Highest-rated school; unrated schools sort last, ties keep dataset order.
    pub fn top_school(&self) -> Option<&School> {
        self.schools.iter().fold(None, |best: Option<&School>, s| match best {
            None => Some(s),
            Some(b) if s.rating.unwrap_or(-1.0) > b.rating.unwrap_or(-1.0) => Some(s),
            Some(b) => Some(b),
        })
    }

    /// Most expensive neighborhood with a known price, else the first listed.
    pub fn top_neighborhood(&self) -> Option<&Neighborhood> {
        self.neighborhoods
            .iter()
            .filter(|n| n.median_price.is_some())
            .fold(None, |best: Option<&Neighborhood>, n| match best {
                Some(b) if b.median_price >= n.median_price => Some(b),
                _ => Some(n),
            })
            .or_else(|| self.neighborhoods.first())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locality() -> LocalityDataset {
        serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Riverton",
            "neighborhoods": [
                {"name": "Old Mill", "median_price": 310000},
                {"name": "Hilltop", "median_price": 540000},
                {"name": "Southgate"}
            ],
            "schools": [
                {"name": "Oak Elementary", "rating": 7.5, "kind": "elementary"},
                {"name": "Riverton High", "rating": 9.0, "kind": "high"},
                {"name": "Unrated Academy", "kind": "private"}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_missing_collections_default_to_empty() {
        let l: LocalityDataset = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Nowhere"
        }))
        .unwrap();
        assert!(l.facts.is_empty());
        assert!(l.community_amenities.is_empty());
        assert!(l.demographics.is_none());
        assert!(!l.has_market_data());
    }

    #[test]
    fn test_top_school_by_rating() {
        assert_eq!(locality().top_school().unwrap().name, "Riverton High");
    }

    #[test]
    fn test_top_neighborhood_by_price() {
        assert_eq!(locality().top_neighborhood().unwrap().name, "Hilltop");
    }

    #[test]
    fn test_top_neighborhood_without_prices_is_first() {
        let mut l = locality();
        for n in &mut l.neighborhoods {
            n.median_price = None;
        }
        assert_eq!(l.top_neighborhood().unwrap().name, "Old Mill");
    }
}
