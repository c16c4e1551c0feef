//! Generator registry: named, deterministic prose builders for dynamic sections.
//!
//! The registry is closed: templates may only reference the names in
//! `Generator::ALL`, and adding one is a code change. Every generator is a pure
//! function of `(subject, locality)`. Phrasing variants are picked from a
//! stable hash of the subject, locality and generator so sibling sites read
//! differently while identical inputs always yield identical text.
//!
//! A generator returns an empty string when the locality has nothing for it
//! to say; the resolver omits such sections.

use serde::Serialize;

use crate::models::locality::{DemographicGroup, LocalityDataset};
use crate::models::subject::SubjectProfile;
use crate::render::format::{currency, group_thousands, join_natural, stable_hash};

const MAX_LISTED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Generator {
    DiversityOverview,
    PlacesOfWorship,
    CommunityAmenities,
    NeighborhoodSpotlight,
    SchoolOverview,
    MarketSnapshot,
    LocalEconomy,
    CityFacts,
    SubjectIntroduction,
}

impl Generator {
    pub const ALL: &'static [Generator] = &[
        Generator::DiversityOverview,
        Generator::PlacesOfWorship,
        Generator::CommunityAmenities,
        Generator::NeighborhoodSpotlight,
        Generator::SchoolOverview,
        Generator::MarketSnapshot,
        Generator::LocalEconomy,
        Generator::CityFacts,
        Generator::SubjectIntroduction,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Generator::DiversityOverview => "diversity_overview",
            Generator::PlacesOfWorship => "places_of_worship",
            Generator::CommunityAmenities => "community_amenities",
            Generator::NeighborhoodSpotlight => "neighborhood_spotlight",
            Generator::SchoolOverview => "school_overview",
            Generator::MarketSnapshot => "market_snapshot",
            Generator::LocalEconomy => "local_economy",
            Generator::CityFacts => "city_facts",
            Generator::SubjectIntroduction => "subject_introduction",
        }
    }

    pub fn from_name(name: &str) -> Option<Generator> {
        Generator::ALL.iter().copied().find(|g| g.name() == name)
    }

    pub fn description(&self) -> &'static str {
        match self {
            Generator::DiversityOverview => "Community make-up from locality demographics",
            Generator::PlacesOfWorship => "Local congregations and places of worship",
            Generator::CommunityAmenities => "Parks, libraries and other shared amenities",
            Generator::NeighborhoodSpotlight => "Named neighborhoods with prices and character",
            Generator::SchoolOverview => "Schools and their ratings",
            Generator::MarketSnapshot => "Median price, trend and inventory",
            Generator::LocalEconomy => "Key employers in the area",
            Generator::CityFacts => "Distinguishing facts about the locality",
            Generator::SubjectIntroduction => "Subject biography, designation and contact",
        }
    }

    pub fn generate(&self, subject: &SubjectProfile, locality: &LocalityDataset) -> String {
        let seed = stable_hash(&[
            subject.id.as_bytes().as_slice(),
            locality.id.as_bytes().as_slice(),
            self.name().as_bytes(),
        ]);
        match self {
            Generator::DiversityOverview => diversity_overview(seed, locality),
            Generator::PlacesOfWorship => places_of_worship(seed, subject, locality),
            Generator::CommunityAmenities => community_amenities(seed, locality),
            Generator::NeighborhoodSpotlight => neighborhood_spotlight(seed, locality),
            Generator::SchoolOverview => school_overview(seed, locality),
            Generator::MarketSnapshot => market_snapshot(seed, subject, locality),
            Generator::LocalEconomy => local_economy(seed, locality),
            Generator::CityFacts => city_facts(seed, locality),
            Generator::SubjectIntroduction => subject_introduction(seed, subject, locality),
        }
    }
}

/// Listing entry for the authoring tool's template editor.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratorInfo {
    pub name: &'static str,
    pub description: &'static str,
}

pub fn generator_catalog() -> Vec<GeneratorInfo> {
    Generator::ALL
        .iter()
        .map(|g| GeneratorInfo {
            name: g.name(),
            description: g.description(),
        })
        .collect()
}

fn pick<'a>(seed: u64, options: &[&'a str]) -> &'a str {
    options[(seed % options.len() as u64) as usize]
}

fn diversity_overview(seed: u64, locality: &LocalityDataset) -> String {
    let Some(demographics) = &locality.demographics else {
        return String::new();
    };
    let city = &locality.name;
    let mut sentences = Vec::new();

    let mut groups: Vec<&DemographicGroup> = demographics.groups.iter().collect();
    groups.sort_by(|a, b| {
        b.share_pct
            .partial_cmp(&a.share_pct)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let described: Vec<String> = groups
        .iter()
        .take(4)
        .map(|g| format!("{} ({:.0}%)", g.label, g.share_pct))
        .collect();
    if !described.is_empty() {
        let opener = pick(
            seed,
            &[
                "{city} is home to a varied community, including",
                "Residents of {city} come from many backgrounds, among them",
                "The people who call {city} home include",
            ],
        )
        .replace("{city}", city);
        sentences.push(format!("{opener} {}.", join_natural(&described)));
    }

    if let Some(age) = demographics.median_age {
        sentences.push(format!("The median age in {city} is {age:.1} years."));
    }
    if let Some(income) = demographics.median_household_income {
        sentences.push(format!(
            "Median household income sits at {} a year.",
            currency(income)
        ));
    }
    sentences.join(" ")
}

fn places_of_worship(seed: u64, subject: &SubjectProfile, locality: &LocalityDataset) -> String {
    if locality.places_of_worship.is_empty() {
        return String::new();
    }
    let listed: Vec<String> = locality
        .places_of_worship
        .iter()
        .take(MAX_LISTED)
        .map(|p| match p.denomination.as_deref() {
            Some(d) if !d.trim().is_empty() => format!("{} ({})", p.name, d.trim()),
            _ => p.name.clone(),
        })
        .collect();
    let lead = pick(
        seed,
        &[
            "Faith communities in {city} include",
            "Congregations gathering across {city} include",
            "Among the places of worship in {city} are",
        ],
    )
    .replace("{city}", &locality.name);
    let follow = pick(
        seed >> 8,
        &[
            "{name} is glad to help newcomers find a congregation that feels like home.",
            "Ask {name} about the communities closest to the homes you are considering.",
        ],
    )
    .replace("{name}", subject.display());
    format!("{lead} {}. {follow}", join_natural(&listed))
}

fn community_amenities(seed: u64, locality: &LocalityDataset) -> String {
    if locality.community_amenities.is_empty() {
        return String::new();
    }
    let listed: Vec<String> = locality
        .community_amenities
        .iter()
        .take(MAX_LISTED + 1)
        .map(|a| match a.category.as_deref() {
            Some(c) if !c.trim().is_empty() => format!("{} ({})", a.name, c.trim()),
            _ => a.name.clone(),
        })
        .collect();
    let lead = pick(
        seed,
        &[
            "Everyday life in {city} is anchored by",
            "Residents of {city} make regular use of",
            "Shared spaces around {city} include",
        ],
    )
    .replace("{city}", &locality.name);
    format!("{lead} {}.", join_natural(&listed))
}

fn neighborhood_spotlight(seed: u64, locality: &LocalityDataset) -> String {
    if locality.neighborhoods.is_empty() {
        return String::new();
    }
    let mut sentences = vec![pick(
        seed,
        &[
            "{city} breaks down into distinct neighborhoods, each with its own character.",
            "No two parts of {city} feel quite the same.",
            "Choosing a neighborhood is the first big decision when moving to {city}.",
        ],
    )
    .replace("{city}", &locality.name)];

    for n in locality.neighborhoods.iter().take(3) {
        let mut sentence = match n.median_price {
            Some(price) => format!("In {}, homes trade around {}", n.name, currency(price)),
            None => format!("{} is worth a look", n.name),
        };
        match n.description.as_deref().map(str::trim) {
            Some(d) if !d.is_empty() => {
                sentence.push_str("; ");
                sentence.push_str(d.trim_end_matches('.'));
                sentence.push('.');
            }
            _ => sentence.push('.'),
        }
        sentences.push(sentence);
    }
    sentences.join(" ")
}

fn school_overview(seed: u64, locality: &LocalityDataset) -> String {
    if locality.schools.is_empty() {
        return String::new();
    }
    let listed: Vec<String> = locality
        .schools
        .iter()
        .take(MAX_LISTED)
        .map(|s| match s.rating {
            Some(r) => format!("{} ({} school, rated {r:.1}/10)", s.name, s.kind.as_str()),
            None => format!("{} ({} school)", s.name, s.kind.as_str()),
        })
        .collect();
    let lead = pick(
        seed,
        &[
            "Families in {city} can choose from",
            "Schools serving {city} include",
            "Students in {city} attend",
        ],
    )
    .replace("{city}", &locality.name);
    let mut text = format!("{lead} {}.", join_natural(&listed));
    if let Some(top) = locality.top_school().filter(|s| s.rating.is_some()) {
        text.push_str(&format!(" {} holds the highest rating in the area.", top.name));
    }
    text
}

fn market_snapshot(seed: u64, subject: &SubjectProfile, locality: &LocalityDataset) -> String {
    if !locality.has_market_data() {
        return String::new();
    }
    let city = &locality.name;
    let mut sentences = Vec::new();
    if let Some(price) = locality.median_price {
        sentences.push(
            pick(
                seed,
                &[
                    "The median home price in {city} is {price}.",
                    "Homes in {city} currently sell for a median of {price}.",
                    "A typical home in {city} lists around {price}.",
                ],
            )
            .replace("{city}", city)
            .replace("{price}", &currency(price)),
        );
    }
    if let Some(trend) = locality.price_trend_pct {
        let rounded = (trend * 10.0).round() / 10.0;
        let sentence = if rounded > 0.0 {
            format!("Prices are up {rounded:.1}% compared with a year ago.")
        } else if rounded < 0.0 {
            format!("Prices are down {:.1}% compared with a year ago.", rounded.abs())
        } else {
            "Prices are flat compared with a year ago.".to_string()
        };
        sentences.push(sentence);
    }
    if let Some(level) = locality.inventory_level {
        sentences.push(format!(
            "Inventory is {} right now, and {} can explain what that means for your timing.",
            level.as_str(),
            subject.display()
        ));
    }
    sentences.join(" ")
}

fn local_economy(seed: u64, locality: &LocalityDataset) -> String {
    if locality.employers.is_empty() {
        return String::new();
    }
    let listed: Vec<&str> = locality
        .employers
        .iter()
        .take(MAX_LISTED)
        .map(String::as_str)
        .collect();
    let lead = pick(
        seed,
        &[
            "Major employers in {city} include",
            "The local economy in {city} leans on",
            "Many {city} residents work for",
        ],
    )
    .replace("{city}", &locality.name);
    let mut text = format!("{lead} {}.", join_natural(&listed));
    if let Some(pop) = locality.population {
        text.push_str(&format!(
            " With about {} residents, commutes stay manageable for most.",
            group_thousands(pop)
        ));
    }
    text
}

fn city_facts(seed: u64, locality: &LocalityDataset) -> String {
    let facts: Vec<&str> = locality
        .facts
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .take(4)
        .collect();
    if facts.is_empty() {
        return String::new();
    }
    let lead = pick(
        seed,
        &[
            "A few things set {city} apart.",
            "Here is what locals like to point out about {city}.",
            "{city} has a story of its own.",
        ],
    )
    .replace("{city}", &locality.name);
    let mut sentences = vec![lead];
    for fact in facts {
        let mut s = fact.to_string();
        if !s.ends_with(['.', '!', '?']) {
            s.push('.');
        }
        sentences.push(s);
    }
    sentences.join(" ")
}

fn subject_introduction(seed: u64, subject: &SubjectProfile, locality: &LocalityDataset) -> String {
    let name = subject.display();
    let city = &locality.name;
    let mut sentences = Vec::new();
    match subject.designation.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => sentences.push(format!(
            "{name}, {d}, works with buyers and sellers in {city}."
        )),
        _ => sentences.push(
            pick(
                seed,
                &[
                    "{name} helps buyers and sellers across {city}.",
                    "{name} has guided many moves in and around {city}.",
                ],
            )
            .replace("{name}", name)
            .replace("{city}", city),
        ),
    }
    if let Some(bio) = subject.bio.as_deref().map(str::trim).filter(|b| !b.is_empty()) {
        sentences.push(bio.to_string());
    }
    let contact: Vec<&str> = [subject.phone.as_deref(), subject.email.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();
    if !contact.is_empty() {
        sentences.push(format!("Reach {name} at {}.", contact.join(" or ")));
    }
    sentences.join(" ")
}
