//! Content uniqueness: how much of an assembled page is specific to its
//! subject and locality versus boilerplate any sibling site would also carry.
//!
//! Algorithm:
//! 1. Split the body into segments at sentence terminators and line breaks.
//! 2. Collect "markers": every token value for the subject and locality
//!    (except the base URL) plus the names, prices, ratings and facts in
//!    the locality's collections.
//! 3. A segment containing a marker (case-insensitive) is specific; otherwise
//!    boilerplate. A repeat of an earlier segment is boilerplate.
//! 4. score = round(100 × specific_chars / total_chars), minus a penalty per
//!    generator short of `min_generators`, clamped to 0–100.
//!
//! Diagnostic only: never mutates the body and never fails a render.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::models::locality::LocalityDataset;
use crate::models::subject::SubjectProfile;
use crate::render::format::currency;
use crate::render::tokens::Token;

/// Thresholds for grading and warnings. Defaults are calibrated by hand and
/// pinned by the tests below; deployments may override them via config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniquenessConfig {
    pub grade_a: u32,
    pub grade_b: u32,
    pub grade_c: u32,
    pub grade_d: u32,
    /// Distinct generators a page should draw on before it stops being penalized.
    pub min_generators: usize,
    /// Points deducted per generator below `min_generators`.
    pub generator_penalty: u32,
    pub min_word_count: usize,
    /// Marker values shorter than this are ignored (they match too much).
    pub min_marker_len: usize,
    /// Specific-content share below which a rewrite is recommended.
    pub low_specific_ratio: f64,
}

impl Default for UniquenessConfig {
    fn default() -> Self {
        Self {
            grade_a: 80,
            grade_b: 60,
            grade_c: 50,
            grade_d: 40,
            min_generators: 3,
            generator_penalty: 10,
            min_word_count: 300,
            min_marker_len: 3,
            low_specific_ratio: 0.5,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UniquenessReport {
    pub score: u32,
    pub grade: Grade,
    pub specific_segments: usize,
    pub boilerplate_segments: usize,
    pub word_count: usize,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn grade_for(score: u32, config: &UniquenessConfig) -> Grade {
    match score {
        s if s >= config.grade_a => Grade::A,
        s if s >= config.grade_b => Grade::B,
        s if s >= config.grade_c => Grade::C,
        s if s >= config.grade_d => Grade::D,
        _ => Grade::F,
    }
}

pub fn analyze(
    body: &str,
    subject: &SubjectProfile,
    locality: &LocalityDataset,
    generators_fired: usize,
    config: &UniquenessConfig,
) -> UniquenessReport {
    let segments = split_segments(body);
    let markers = collect_markers(subject, locality, config.min_marker_len);
    let word_count = body.split_whitespace().count();

    let mut seen: HashSet<String> = HashSet::new();
    let mut specific_chars = 0usize;
    let mut total_chars = 0usize;
    let mut specific_segments = 0usize;
    let mut boilerplate_segments = 0usize;

    for segment in &segments {
        let len = segment.chars().count();
        total_chars += len;
        let lowered = segment.to_lowercase();
        let first_occurrence = seen.insert(lowered.clone());
        if first_occurrence && markers.matches(&lowered) {
            specific_chars += len;
            specific_segments += 1;
        } else {
            boilerplate_segments += 1;
        }
    }

    let specific_ratio = if total_chars > 0 {
        specific_chars as f64 / total_chars as f64
    } else {
        0.0
    };
    let base = (specific_ratio * 100.0).round() as u32;
    let shortfall = config.min_generators.saturating_sub(generators_fired) as u32;
    let score = base
        .saturating_sub(shortfall * config.generator_penalty)
        .min(100);
    let grade = grade_for(score, config);

    let body_lower = body.to_lowercase();
    let recommendations = build_recommendations(
        subject,
        locality,
        &body_lower,
        specific_ratio,
        generators_fired,
        config,
    );
    let warnings = build_warnings(locality, word_count, config);

    UniquenessReport {
        score,
        grade,
        specific_segments,
        boilerplate_segments,
        word_count,
        recommendations,
        warnings,
    }
}

/// Splits at `.`, `!`, `?` followed by whitespace (or end of text) and at line
/// breaks. Empty segments are dropped; segments are trimmed.
fn split_segments(body: &str) -> Vec<String> {
    let mut segments = Vec::new();
    for line in body.lines() {
        let mut current = String::new();
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            current.push(c);
            let at_boundary = matches!(c, '.' | '!' | '?')
                && chars.peek().map_or(true, |next| next.is_whitespace());
            if at_boundary {
                push_segment(&mut segments, &current);
                current.clear();
            }
        }
        push_segment(&mut segments, &current);
    }
    segments
}

fn push_segment(segments: &mut Vec<String>, raw: &str) {
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        segments.push(trimmed.to_string());
    }
}

/// Lower-cased values that only appear in text written for this subject and
/// locality. Short numeric values (counts) are kept apart and matched as
/// whole numbers; other values shorter than `min_len` are dropped.
struct Markers {
    phrases: Vec<String>,
    numbers: Vec<String>,
}

impl Markers {
    fn matches(&self, lowered: &str) -> bool {
        if self.phrases.iter().any(|m| lowered.contains(m.as_str())) {
            return true;
        }
        !self.numbers.is_empty()
            && lowered
                .split(|c: char| !(c.is_ascii_alphanumeric() || c == '.' || c == ','))
                .map(|w| w.trim_end_matches(['.', ',']))
                .any(|w| self.numbers.iter().any(|n| n == w))
    }
}

fn collect_markers(
    subject: &SubjectProfile,
    locality: &LocalityDataset,
    min_len: usize,
) -> Markers {
    let mut raw: Vec<String> = Token::ALL
        .iter()
        .filter(|t| !matches!(t, Token::BaseUrl))
        .filter_map(|t| t.value(subject, locality, ""))
        .collect();

    if let Some(trend) = locality.price_trend_pct {
        raw.push(format!("{:.1}%", trend.abs()));
    }
    for n in &locality.neighborhoods {
        raw.push(n.name.clone());
        if let Some(price) = n.median_price {
            raw.push(currency(price));
        }
    }
    for school in &locality.schools {
        raw.push(school.name.clone());
        if let Some(rating) = school.rating {
            raw.push(format!("{rating:.1}/10"));
        }
    }
    raw.extend(locality.employers.iter().cloned());
    for fact in &locality.facts {
        raw.extend(split_segments(fact));
    }
    for place in &locality.places_of_worship {
        raw.push(place.name.clone());
        raw.extend(place.denomination.iter().cloned());
    }
    raw.extend(locality.community_amenities.iter().map(|a| a.name.clone()));
    if let Some(d) = &locality.demographics {
        raw.extend(d.groups.iter().map(|g| g.label.clone()));
        if let Some(income) = d.median_household_income {
            raw.push(currency(income));
        }
    }

    let mut phrases = Vec::new();
    let mut numbers = Vec::new();
    for value in raw {
        let m = value.trim().trim_end_matches('.').to_lowercase();
        if m.chars().count() >= min_len {
            phrases.push(m);
        } else if !m.is_empty() && m.chars().all(|c| c.is_ascii_digit()) {
            numbers.push(m);
        }
    }
    phrases.sort();
    phrases.dedup();
    numbers.sort();
    numbers.dedup();
    Markers { phrases, numbers }
}

fn build_recommendations(
    subject: &SubjectProfile,
    locality: &LocalityDataset,
    body_lower: &str,
    specific_ratio: f64,
    generators_fired: usize,
    config: &UniquenessConfig,
) -> Vec<String> {
    let city = &locality.name;
    let mut recs = Vec::new();

    if locality.neighborhoods.is_empty() {
        recs.push(format!(
            "No neighborhood data available for {city} - add records to increase uniqueness"
        ));
    } else if !mentions_any(body_lower, locality.neighborhoods.iter().map(|n| &n.name)) {
        recs.push(format!("Add neighborhood-specific detail for {city}"));
    }

    if locality.schools.is_empty() {
        recs.push(format!(
            "No schools data available for {city} - add records to increase uniqueness"
        ));
    } else if !mentions_any(body_lower, locality.schools.iter().map(|s| &s.name)) {
        recs.push(format!("Mention schools serving {city}"));
    }

    if locality.employers.is_empty() {
        recs.push(format!(
            "No employer data available for {city} - add key employers to increase uniqueness"
        ));
    }

    if locality.facts.is_empty() {
        recs.push(format!(
            "Add distinguishing facts about {city} to set this page apart"
        ));
    }

    if generators_fired < config.min_generators {
        recs.push(format!(
            "Only {generators_fired} dynamic section(s) produced content - add sections \
             backed by locality data (at least {} recommended)",
            config.min_generators
        ));
    }

    if specific_ratio < config.low_specific_ratio {
        recs.push(format!(
            "Most of this page is generic ({:.0}% specific) - replace boilerplate sentences \
             with detail about {city} or {}",
            specific_ratio * 100.0,
            subject.display()
        ));
    }

    if !subject.has_bio() {
        recs.push(format!(
            "Add a short biography for {} to personalize the page",
            subject.display()
        ));
    }

    recs
}

fn mentions_any<'a>(body_lower: &str, mut names: impl Iterator<Item = &'a String>) -> bool {
    names.any(|n| body_lower.contains(&n.to_lowercase()))
}

fn build_warnings(
    locality: &LocalityDataset,
    word_count: usize,
    config: &UniquenessConfig,
) -> Vec<String> {
    let mut warnings = Vec::new();
    if word_count == 0 {
        warnings.push("Body is empty".to_string());
    } else if word_count < config.min_word_count {
        warnings.push(format!(
            "Body is {word_count} words; at least {} are recommended",
            config.min_word_count
        ));
    }
    if locality.facts.is_empty() {
        warnings.push(format!(
            "No locality facts are available for {}",
            locality.name
        ));
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::generators::Generator;
    use crate::render::sample::{sample_locality, sample_subject};
    use crate::render::substitution::{substitute, TokenContext};

    const BOILERPLATE: &str = "Buying a home is a big decision.";

    fn score(body: &str, generators: usize) -> UniquenessReport {
        analyze(
            body,
            &sample_subject(),
            &sample_locality(),
            generators,
            &UniquenessConfig::default(),
        )
    }

    #[test]
    fn test_default_thresholds() {
        let c = UniquenessConfig::default();
        assert_eq!(grade_for(80, &c), Grade::A);
        assert_eq!(grade_for(79, &c), Grade::B);
        assert_eq!(grade_for(60, &c), Grade::B);
        assert_eq!(grade_for(59, &c), Grade::C);
        assert_eq!(grade_for(50, &c), Grade::C);
        assert_eq!(grade_for(40, &c), Grade::D);
        assert_eq!(grade_for(39, &c), Grade::F);
        assert_eq!(c.min_generators, 3);
        assert_eq!(c.generator_penalty, 10);
        assert_eq!(c.min_word_count, 300);
    }

    #[test]
    fn test_all_boilerplate_scores_zero() {
        let r = score(&format!("{BOILERPLATE} We are here to help."), 3);
        assert_eq!(r.score, 0);
        assert_eq!(r.grade, Grade::F);
        assert_eq!(r.specific_segments, 0);
        assert_eq!(r.boilerplate_segments, 2);
    }

    #[test]
    fn test_all_specific_scores_full() {
        let r = score(
            "Maple Falls has a covered bridge. Cedar Bluff sits above the river.",
            3,
        );
        assert_eq!(r.score, 100);
        assert_eq!(r.grade, Grade::A);
    }

    #[test]
    fn test_too_few_generators_penalized() {
        let body = "Maple Falls has a covered bridge. Cedar Bluff sits above the river.";
        assert_eq!(score(body, 1).score, 80);
        assert_eq!(score(body, 0).score, 70);
        assert_eq!(score(body, 5).score, 100);
        assert!(score(body, 1)
            .recommendations
            .iter()
            .any(|r| r.contains("dynamic section")));
    }

    #[test]
    fn test_marker_match_is_case_insensitive() {
        let r = score("MAPLE FALLS is lovely.", 3);
        assert_eq!(r.specific_segments, 1);
    }

    #[test]
    fn test_substituted_token_values_are_specific() {
        let locality = sample_locality();
        let subject = sample_subject();
        let ctx = TokenContext {
            subject: &subject,
            locality: &locality,
            base_url: "https://www.example.com",
        };
        let body = substitute(
            "Prices moved {{PRICE_TREND}} over the year.\n\
             Inventory is {{INVENTORY_LEVEL}} right now.\n\
             Visit {{SUBJECT_WEBSITE}} for listings.",
            &ctx,
        )
        .text;
        let r = score(&body, 3);
        assert_eq!(r.specific_segments, 3, "{body}");
        assert_eq!(r.score, 100);
    }

    #[test]
    fn test_market_snapshot_output_is_all_specific() {
        let body = Generator::MarketSnapshot.generate(&sample_subject(), &sample_locality());
        let r = score(&body, 3);
        assert_eq!(r.boilerplate_segments, 0, "{body}");
    }

    #[test]
    fn test_school_rating_and_count_are_markers() {
        let r = score("Top marks: 9.1/10 from parents.\nThere are 3 to choose from.", 3);
        assert_eq!(r.specific_segments, 2);

        // A longer number that merely contains the count does not match.
        let r = score("Over 300 buyers called.", 3);
        assert_eq!(r.specific_segments, 0);
    }

    #[test]
    fn test_multi_sentence_fact_matches_per_sentence() {
        let mut locality = sample_locality();
        locality.facts =
            vec!["The mill opened in 1902. It still grinds flour on Saturdays.".to_string()];
        let r = analyze(
            "It still grinds flour on Saturdays.",
            &sample_subject(),
            &locality,
            3,
            &UniquenessConfig::default(),
        );
        assert_eq!(r.specific_segments, 1);
    }

    #[test]
    fn test_repeated_segment_counts_as_boilerplate() {
        let r = score("Maple Falls is lovely. Maple Falls is lovely.", 3);
        assert_eq!(r.specific_segments, 1);
        assert_eq!(r.boilerplate_segments, 1);
        assert_eq!(r.score, 50);
    }

    #[test]
    fn test_replacing_boilerplate_never_lowers_score() {
        let before = format!("Maple Falls is lovely. {BOILERPLATE} {BOILERPLATE} Call today.");
        let after = format!(
            "Maple Falls is lovely. {BOILERPLATE} \
             Cedar Bluff homes trade around $465,000. Call today."
        );
        let r_before = score(&before, 2);
        let r_after = score(&after, 3);
        assert!(r_after.score >= r_before.score);

        let same_generators = score(&after, 2);
        assert!(same_generators.score >= r_before.score);
    }

    #[test]
    fn test_segments_split_on_sentences_and_lines() {
        let segs = split_segments("One. Two!\nThree? Four\n\n$1.5 million homes.");
        assert_eq!(segs, vec!["One.", "Two!", "Three?", "Four", "$1.5 million homes."]);
    }

    #[test]
    fn test_short_body_warns() {
        let r = score("Maple Falls.", 3);
        assert!(r.warnings.iter().any(|w| w.contains("words")));
        assert_eq!(r.word_count, 2);
    }

    #[test]
    fn test_empty_body_warns_and_scores_zero() {
        let r = score("", 0);
        assert_eq!(r.score, 0);
        assert!(r.warnings.iter().any(|w| w == "Body is empty"));
    }

    #[test]
    fn test_missing_data_recommendations() {
        let mut locality = sample_locality();
        locality.schools.clear();
        locality.facts.clear();
        let r = analyze(
            "Maple Falls.",
            &sample_subject(),
            &locality,
            3,
            &UniquenessConfig::default(),
        );
        assert!(r
            .recommendations
            .iter()
            .any(|m| m.contains("No schools data available for Maple Falls")));
        assert!(r.warnings.iter().any(|w| w.contains("No locality facts")));
        assert!(r
            .recommendations
            .iter()
            .any(|m| m.contains("neighborhood-specific detail")));
    }

    #[test]
    fn test_body_is_not_mutated() {
        let body = String::from("Maple Falls is lovely.");
        let copy = body.clone();
        let _ = score(&body, 3);
        assert_eq!(body, copy);
    }
}
