//! Template definitions as authored, and their compiled form.
//!
//! Templates are compiled before use: every structural rule is checked once
//! and generator names are bound to the closed `Generator` registry, so the
//! resolver never meets an unknown name at render time.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::locality::LocalityDataset;
use crate::models::subject::SubjectProfile;
use crate::render::generators::Generator;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Literal,
    Dynamic,
}

/// Where a section's content lands in the assembled document.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SectionRole {
    Title,
    Description,
    #[default]
    Body,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum LocalityCollection {
    Neighborhoods,
    Schools,
    Facts,
    Employers,
    PlacesOfWorship,
    CommunityAmenities,
}

impl LocalityCollection {
    pub fn len_in(&self, locality: &LocalityDataset) -> usize {
        match self {
            LocalityCollection::Neighborhoods => locality.neighborhoods.len(),
            LocalityCollection::Schools => locality.schools.len(),
            LocalityCollection::Facts => locality.facts.len(),
            LocalityCollection::Employers => locality.employers.len(),
            LocalityCollection::PlacesOfWorship => locality.places_of_worship.len(),
            LocalityCollection::CommunityAmenities => locality.community_amenities.len(),
        }
    }
}

/// Closed set of predicates a dynamic section can be gated on.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionCondition {
    Always,
    HasDemographics,
    HasMarketData,
    HasSubjectBio,
    MinEntries {
        collection: LocalityCollection,
        min: usize,
    },
}

impl SectionCondition {
    pub fn evaluate(&self, subject: &SubjectProfile, locality: &LocalityDataset) -> bool {
        match self {
            SectionCondition::Always => true,
            SectionCondition::HasDemographics => locality.demographics.is_some(),
            SectionCondition::HasMarketData => locality.has_market_data(),
            SectionCondition::HasSubjectBio => subject.has_bio(),
            SectionCondition::MinEntries { collection, min } => collection.len_in(locality) >= *min,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionDefinition {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    #[serde(default)]
    pub role: SectionRole,
    pub literal_body: Option<String>,
    pub generator: Option<String>,
    pub condition: Option<SectionCondition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateDefinition {
    pub id: String,
    pub name: Option<String>,
    pub sections: Vec<SectionDefinition>,
}

/// Structural problems in a template. These are authoring mistakes in the
/// template itself, never content sparsity.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("template '{template_id}' has no sections")]
    Empty { template_id: String },

    #[error("section '{section_id}' appears more than once")]
    DuplicateSection { section_id: String },

    #[error("dynamic section '{section_id}' does not name a generator")]
    MissingGenerator { section_id: String },

    #[error("section '{section_id}' references unknown generator '{generator}'")]
    UnknownGenerator { section_id: String, generator: String },

    #[error("literal section '{section_id}' has no literal_body")]
    MissingLiteralBody { section_id: String },

    #[error("literal section '{section_id}' cannot carry a condition")]
    ConditionOnLiteral { section_id: String },

    #[error("more than one section has role '{role}' ('{first}' and '{second}')")]
    DuplicateRole {
        role: &'static str,
        first: String,
        second: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum SectionSource {
    Literal(String),
    Dynamic {
        generator: Generator,
        condition: SectionCondition,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSection {
    pub id: String,
    pub name: String,
    pub role: SectionRole,
    pub source: SectionSource,
}

impl CompiledSection {
    pub fn kind(&self) -> SectionKind {
        match self.source {
            SectionSource::Literal(_) => SectionKind::Literal,
            SectionSource::Dynamic { .. } => SectionKind::Dynamic,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTemplate {
    pub id: String,
    pub sections: Vec<CompiledSection>,
}

impl CompiledTemplate {
    #[cfg(test)]
    pub fn has_role(&self, role: SectionRole) -> bool {
        self.sections.iter().any(|s| s.role == role)
    }
}

impl TemplateDefinition {
    pub fn compile(&self) -> Result<CompiledTemplate, TemplateError> {
        if self.sections.is_empty() {
            return Err(TemplateError::Empty {
                template_id: self.id.clone(),
            });
        }

        let mut seen_ids = HashSet::new();
        let mut title_owner: Option<&str> = None;
        let mut description_owner: Option<&str> = None;
        let mut sections = Vec::with_capacity(self.sections.len());

        for section in &self.sections {
            if !seen_ids.insert(section.id.as_str()) {
                return Err(TemplateError::DuplicateSection {
                    section_id: section.id.clone(),
                });
            }

            let owner = match section.role {
                SectionRole::Title => Some(("title", &mut title_owner)),
                SectionRole::Description => Some(("description", &mut description_owner)),
                SectionRole::Body => None,
            };
            if let Some((role, slot)) = owner {
                if let Some(first) = *slot {
                    return Err(TemplateError::DuplicateRole {
                        role,
                        first: first.to_string(),
                        second: section.id.clone(),
                    });
                }
                *slot = Some(section.id.as_str());
            }

            let source = match section.kind {
                SectionKind::Literal => {
                    if section.condition.is_some() {
                        return Err(TemplateError::ConditionOnLiteral {
                            section_id: section.id.clone(),
                        });
                    }
                    let body = section.literal_body.clone().ok_or_else(|| {
                        TemplateError::MissingLiteralBody {
                            section_id: section.id.clone(),
                        }
                    })?;
                    SectionSource::Literal(body)
                }
                SectionKind::Dynamic => {
                    let name = section
                        .generator
                        .as_deref()
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .ok_or_else(|| TemplateError::MissingGenerator {
                            section_id: section.id.clone(),
                        })?;
                    let generator = Generator::from_name(name).ok_or_else(|| {
                        TemplateError::UnknownGenerator {
                            section_id: section.id.clone(),
                            generator: name.to_string(),
                        }
                    })?;
                    SectionSource::Dynamic {
                        generator,
                        condition: section.condition.unwrap_or(SectionCondition::Always),
                    }
                }
            };

            sections.push(CompiledSection {
                id: section.id.clone(),
                name: section.name.clone(),
                role: section.role,
                source,
            });
        }

        Ok(CompiledTemplate {
            id: self.id.clone(),
            sections,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(sections: serde_json::Value) -> TemplateDefinition {
        serde_json::from_value(json!({ "id": "t1", "sections": sections })).unwrap()
    }

    #[test]
    fn test_compiles_literal_and_dynamic_sections() {
        let t = template(json!([
            {"id": "title", "name": "Title", "type": "literal", "role": "title",
             "literal_body": "Homes in {{CITY_NAME}}"},
            {"id": "div", "name": "Diversity", "type": "dynamic",
             "generator": "diversity_overview", "condition": {"kind": "has_demographics"}}
        ]));
        let compiled = t.compile().unwrap();
        assert_eq!(compiled.sections.len(), 2);
        assert_eq!(compiled.sections[0].role, SectionRole::Title);
        assert_eq!(
            compiled.sections[1].source,
            SectionSource::Dynamic {
                generator: Generator::DiversityOverview,
                condition: SectionCondition::HasDemographics,
            }
        );
    }

    #[test]
    fn test_role_defaults_to_body() {
        let t = template(json!([
            {"id": "a", "name": "A", "type": "literal", "literal_body": "x"}
        ]));
        assert_eq!(t.compile().unwrap().sections[0].role, SectionRole::Body);
    }

    #[test]
    fn test_missing_condition_means_always() {
        let t = template(json!([
            {"id": "m", "name": "Market", "type": "dynamic", "generator": "market_snapshot"}
        ]));
        match &t.compile().unwrap().sections[0].source {
            SectionSource::Dynamic { condition, .. } => {
                assert_eq!(*condition, SectionCondition::Always)
            }
            other => panic!("unexpected source {other:?}"),
        }
    }

    #[test]
    fn test_unknown_generator_is_rejected() {
        let t = template(json!([
            {"id": "x", "name": "X", "type": "dynamic", "generator": "weather_forecast"}
        ]));
        assert_eq!(
            t.compile().unwrap_err(),
            TemplateError::UnknownGenerator {
                section_id: "x".to_string(),
                generator: "weather_forecast".to_string()
            }
        );
    }

    #[test]
    fn test_dynamic_without_generator_is_rejected() {
        let t = template(json!([{"id": "x", "name": "X", "type": "dynamic"}]));
        assert!(matches!(
            t.compile(),
            Err(TemplateError::MissingGenerator { .. })
        ));

        let blank = template(json!([
            {"id": "x", "name": "X", "type": "dynamic", "generator": "  "}
        ]));
        assert!(matches!(
            blank.compile(),
            Err(TemplateError::MissingGenerator { .. })
        ));
    }

    #[test]
    fn test_literal_without_body_is_rejected() {
        let t = template(json!([{"id": "x", "name": "X", "type": "literal"}]));
        assert!(matches!(
            t.compile(),
            Err(TemplateError::MissingLiteralBody { .. })
        ));
    }

    #[test]
    fn test_duplicate_section_ids_rejected() {
        let t = template(json!([
            {"id": "a", "name": "A", "type": "literal", "literal_body": "x"},
            {"id": "a", "name": "A2", "type": "literal", "literal_body": "y"}
        ]));
        assert!(matches!(
            t.compile(),
            Err(TemplateError::DuplicateSection { .. })
        ));
    }

    #[test]
    fn test_two_title_sections_rejected() {
        let t = template(json!([
            {"id": "a", "name": "A", "type": "literal", "role": "title", "literal_body": "x"},
            {"id": "b", "name": "B", "type": "literal", "role": "title", "literal_body": "y"}
        ]));
        assert_eq!(
            t.compile().unwrap_err(),
            TemplateError::DuplicateRole {
                role: "title",
                first: "a".to_string(),
                second: "b".to_string()
            }
        );
    }

    #[test]
    fn test_condition_on_literal_rejected() {
        let t = template(json!([
            {"id": "a", "name": "A", "type": "literal", "literal_body": "x",
             "condition": {"kind": "always"}}
        ]));
        assert!(matches!(
            t.compile(),
            Err(TemplateError::ConditionOnLiteral { .. })
        ));
    }

    #[test]
    fn test_empty_template_rejected() {
        let t = template(json!([]));
        assert!(matches!(t.compile(), Err(TemplateError::Empty { .. })));
    }

    #[test]
    fn test_min_entries_condition() {
        let locality: LocalityDataset = serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4(),
            "name": "Riverton",
            "community_amenities": [{"name": "Riverside Park"}]
        }))
        .unwrap();
        let subject: SubjectProfile = serde_json::from_value(json!({
            "id": uuid::Uuid::new_v4(),
            "name": "Sam Park"
        }))
        .unwrap();

        let one = SectionCondition::MinEntries {
            collection: LocalityCollection::CommunityAmenities,
            min: 1,
        };
        let two = SectionCondition::MinEntries {
            collection: LocalityCollection::CommunityAmenities,
            min: 2,
        };
        assert!(one.evaluate(&subject, &locality));
        assert!(!two.evaluate(&subject, &locality));
        assert!(!SectionCondition::HasSubjectBio.evaluate(&subject, &locality));
    }
}
