//! Section resolver: turns a template plus a render context into a page.
//!
//! Flow: compile template → for each section in order: override | literal
//! substitution | condition + generator → assemble title/description/body →
//! uniqueness analysis.
//!
//! Pure: identical inputs give byte-identical output. Content sparsity never
//! fails a render; only a structurally broken template does.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use crate::analysis::{analyze, UniquenessConfig, UniquenessReport};
use crate::models::content::SectionOverrides;
use crate::models::locality::LocalityDataset;
use crate::models::subject::SubjectProfile;
use crate::models::template::{
    CompiledSection, CompiledTemplate, SectionKind, SectionRole, SectionSource,
    TemplateDefinition, TemplateError,
};
use crate::render::format::excerpt;
use crate::render::substitution::{substitute, TokenContext};

/// Meta descriptions longer than this are cut by search engines anyway.
pub const META_DESCRIPTION_MAX: usize = 160;

const SECTION_SEPARATOR: &str = "\n\n";

// ────────────────────────────────────────────────────────────────────────────
// Data models
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub subject: &'a SubjectProfile,
    pub locality: &'a LocalityDataset,
    pub base_url: &'a str,
    pub overrides: &'a SectionOverrides,
}

/// Per-section diagnostics. Omitted sections never appear here.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ResolvedSection {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: SectionKind,
    pub role: SectionRole,
    pub was_overridden: bool,
    pub content_length: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RenderMetadata {
    pub template_id: String,
    pub subject_id: Uuid,
    pub locality_id: Uuid,
    pub word_count: usize,
    /// Dynamic sections skipped because their condition was false or their
    /// generator had nothing to say.
    pub omitted_sections: Vec<String>,
    /// Override keys that match no section in the template.
    pub unknown_override_ids: Vec<String>,
    pub title_from_fallback: bool,
    pub description_from_fallback: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderResult {
    pub title: String,
    pub description: String,
    pub body: String,
    pub sections: Vec<ResolvedSection>,
    pub uniqueness_score: u32,
    pub uniqueness_analysis: UniquenessReport,
    pub missing_tokens: Vec<String>,
    pub used_generators: Vec<String>,
    pub metadata: RenderMetadata,
}

struct SectionOutput<'t> {
    section: &'t CompiledSection,
    text: String,
    was_overridden: bool,
}

// ────────────────────────────────────────────────────────────────────────────
// Resolution
// ────────────────────────────────────────────────────────────────────────────

/// Compiles `template` and renders it. Configuration errors are returned
/// before any section is resolved.
pub fn resolve(
    template: &TemplateDefinition,
    ctx: &RenderContext<'_>,
    uniqueness: &UniquenessConfig,
) -> Result<RenderResult, TemplateError> {
    let compiled = template.compile()?;
    Ok(resolve_compiled(&compiled, ctx, uniqueness))
}

pub fn resolve_compiled(
    template: &CompiledTemplate,
    ctx: &RenderContext<'_>,
    uniqueness: &UniquenessConfig,
) -> RenderResult {
    let token_ctx = TokenContext {
        subject: ctx.subject,
        locality: ctx.locality,
        base_url: ctx.base_url,
    };

    let mut outputs: Vec<SectionOutput<'_>> = Vec::with_capacity(template.sections.len());
    let mut missing_tokens: Vec<String> = Vec::new();
    let mut used_generators: Vec<String> = Vec::new();
    let mut omitted_sections: Vec<String> = Vec::new();

    for section in &template.sections {
        if let Some(replacement) = ctx.overrides.get(&section.id) {
            outputs.push(SectionOutput {
                section,
                text: replacement.to_string(),
                was_overridden: true,
            });
            continue;
        }

        match &section.source {
            SectionSource::Literal(body) => {
                let substituted = substitute(body, &token_ctx);
                for token in substituted.missing_tokens {
                    if !missing_tokens.contains(&token) {
                        missing_tokens.push(token);
                    }
                }
                outputs.push(SectionOutput {
                    section,
                    text: substituted.text,
                    was_overridden: false,
                });
            }
            SectionSource::Dynamic {
                generator,
                condition,
            } => {
                if !condition.evaluate(ctx.subject, ctx.locality) {
                    debug!(section = %section.id, "Condition false; omitting section");
                    omitted_sections.push(section.id.clone());
                    continue;
                }
                let prose = generator.generate(ctx.subject, ctx.locality);
                if prose.trim().is_empty() {
                    debug!(
                        section = %section.id,
                        generator = generator.name(),
                        "Generator produced no prose; omitting section"
                    );
                    omitted_sections.push(section.id.clone());
                    continue;
                }
                let name = generator.name().to_string();
                if !used_generators.contains(&name) {
                    used_generators.push(name);
                }
                outputs.push(SectionOutput {
                    section,
                    text: prose,
                    was_overridden: false,
                });
            }
        }
    }

    let body = outputs
        .iter()
        .filter(|o| o.section.role == SectionRole::Body)
        .map(|o| o.text.trim())
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR);

    let (title, title_from_fallback) = assemble_title(&outputs);
    let (description, description_from_fallback) = assemble_description(&outputs, &body);

    let uniqueness_analysis = analyze(
        &body,
        ctx.subject,
        ctx.locality,
        used_generators.len(),
        uniqueness,
    );

    let section_ids: HashSet<&str> = template.sections.iter().map(|s| s.id.as_str()).collect();
    let mut unknown_override_ids: Vec<String> = ctx
        .overrides
        .section_ids()
        .filter(|id| !section_ids.contains(id))
        .map(String::from)
        .collect();
    unknown_override_ids.sort();

    let sections = outputs
        .iter()
        .map(|o| ResolvedSection {
            id: o.section.id.clone(),
            name: o.section.name.clone(),
            kind: o.section.kind(),
            role: o.section.role,
            was_overridden: o.was_overridden,
            content_length: o.text.chars().count(),
        })
        .collect();

    RenderResult {
        title,
        description,
        uniqueness_score: uniqueness_analysis.score,
        metadata: RenderMetadata {
            template_id: template.id.clone(),
            subject_id: ctx.subject.id,
            locality_id: ctx.locality.id,
            word_count: uniqueness_analysis.word_count,
            omitted_sections,
            unknown_override_ids,
            title_from_fallback,
            description_from_fallback,
        },
        uniqueness_analysis,
        body,
        sections,
        missing_tokens,
        used_generators,
    }
}

/// The title-role section if it rendered; otherwise the first line of the
/// first literal or overridden body section.
fn assemble_title(outputs: &[SectionOutput<'_>]) -> (String, bool) {
    if let Some(o) = outputs.iter().find(|o| o.section.role == SectionRole::Title) {
        return (collapse_whitespace(&o.text), false);
    }
    let fallback = outputs
        .iter()
        .filter(|o| o.section.role == SectionRole::Body)
        .find(|o| o.was_overridden || o.section.kind() == SectionKind::Literal)
        .and_then(|o| o.text.lines().map(str::trim).find(|l| !l.is_empty()))
        .map(String::from)
        .unwrap_or_default();
    (fallback, true)
}

/// The description-role section if it rendered; otherwise a body excerpt.
fn assemble_description(outputs: &[SectionOutput<'_>], body: &str) -> (String, bool) {
    match outputs
        .iter()
        .find(|o| o.section.role == SectionRole::Description)
    {
        Some(o) => (collapse_whitespace(&o.text), false),
        None => (excerpt(body, META_DESCRIPTION_MAX), true),
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
