//! Axum route handlers for page rendering and the authoring listings.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::announcements::handlers::{targeted_summaries, AnnouncementSummary};
use crate::announcements::TargetingContext;
use crate::errors::AppError;
use crate::models::content::SectionOverrides;
use crate::models::locality::LocalityDataset;
use crate::models::subject::SubjectProfile;
use crate::models::template::TemplateDefinition;
use crate::render::generators::{generator_catalog, GeneratorInfo};
use crate::render::resolver::{resolve, resolve_compiled, RenderContext, RenderResult};
use crate::render::sample::{sample_locality, sample_subject, DEFAULT_TEMPLATE_ID};
use crate::render::tokens::{token_catalog, TokenInfo};
use crate::seo::canonical::bare_host;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SectionOverrideInput {
    pub section_id: String,
    pub body: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    /// Stored template to render. Mutually exclusive with `template`.
    pub template_id: Option<String>,
    /// Unsaved template to preview.
    pub template: Option<TemplateDefinition>,
    pub subject_id: Option<Uuid>,
    pub locality_id: Option<Uuid>,
    pub base_url: Option<String>,
    #[serde(default)]
    pub overrides: Vec<SectionOverrideInput>,
    /// Tenant whose primary domain becomes `{{BASE_URL}}` when `base_url` is absent.
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub include_announcements: bool,
}

#[derive(Debug, Serialize)]
pub struct RenderResponse {
    #[serde(flatten)]
    pub result: RenderResult,
    pub announcements: Vec<AnnouncementSummary>,
}

#[derive(Debug, Serialize)]
pub struct GeneratorListResponse {
    pub generators: Vec<GeneratorInfo>,
}

#[derive(Debug, Serialize)]
pub struct TokenListResponse {
    pub tokens: Vec<TokenInfo>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/render
///
/// Renders a template for a subject and locality. Omitted ids fall back to
/// the sample records; an omitted template falls back to the default one.
/// Announcements, when requested, are appended after the page is scored.
pub async fn handle_render(
    State(state): State<AppState>,
    Json(request): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AppError> {
    if request.template.is_some() && request.template_id.is_some() {
        return Err(AppError::Validation(
            "provide either template_id or template, not both".to_string(),
        ));
    }

    let overrides = SectionOverrides::from_entries(
        request
            .overrides
            .into_iter()
            .map(|o| (o.section_id, o.body)),
    )?;
    let subject = load_subject(&state, request.subject_id).await?;
    let locality = load_locality(&state, request.locality_id).await?;
    let base_url = resolve_base_url(&state, request.base_url, request.tenant_id).await?;

    let ctx = RenderContext {
        subject: &subject,
        locality: &locality,
        base_url: &base_url,
        overrides: &overrides,
    };

    let mut result = match request.template {
        Some(inline) => resolve(&inline, &ctx, &state.config.uniqueness)?,
        None => {
            let id = request.template_id.as_deref().unwrap_or(DEFAULT_TEMPLATE_ID);
            let compiled = state.source.template(id).await?;
            resolve_compiled(&compiled, &ctx, &state.config.uniqueness)
        }
    };

    info!(
        template_id = %result.metadata.template_id,
        subject_id = %subject.id,
        locality_id = %locality.id,
        score = result.uniqueness_score,
        "Page rendered"
    );

    let announcements = if request.include_announcements {
        let targeting = TargetingContext {
            subject_id: Some(subject.id),
            city_id: Some(locality.id),
            state_id: locality.state_id.or(subject.state_id),
        };
        let selected = targeted_summaries(&state, &targeting, Utc::now()).await?;
        for a in &selected {
            result.body.push_str("\n\n");
            result.body.push_str(&a.html);
        }
        selected
    } else {
        Vec::new()
    };

    Ok(Json(RenderResponse {
        result,
        announcements,
    }))
}

/// GET /api/v1/generators
pub async fn handle_list_generators() -> Json<GeneratorListResponse> {
    Json(GeneratorListResponse {
        generators: generator_catalog(),
    })
}

/// GET /api/v1/tokens
pub async fn handle_list_tokens() -> Json<TokenListResponse> {
    Json(TokenListResponse {
        tokens: token_catalog(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

async fn load_subject(state: &AppState, id: Option<Uuid>) -> Result<SubjectProfile, AppError> {
    match id {
        Some(id) => state.source.subject(id).await,
        None => Ok(sample_subject()),
    }
}

async fn load_locality(state: &AppState, id: Option<Uuid>) -> Result<LocalityDataset, AppError> {
    match id {
        Some(id) => state.source.locality(id).await,
        None => Ok(sample_locality()),
    }
}

/// Explicit `base_url`, else the tenant's primary domain, else the network
/// default domain.
async fn resolve_base_url(
    state: &AppState,
    explicit: Option<String>,
    tenant_id: Option<Uuid>,
) -> Result<String, AppError> {
    if let Some(url) = explicit.filter(|u| !u.trim().is_empty()) {
        return Ok(url.trim().to_string());
    }
    let scheme = &state.config.url_scheme;
    if let Some(tenant_id) = tenant_id {
        let registry = state.source.tenants().await?;
        let tenant = registry
            .get(tenant_id)
            .ok_or_else(|| AppError::NotFound(format!("tenant {tenant_id}")))?;
        if let Some(domain) = tenant.primary_domain() {
            return Ok(format!("{scheme}://{}", bare_host(domain)));
        }
    }
    Ok(format!(
        "{scheme}://{}",
        bare_host(&state.config.network_default_domain)
    ))
}
