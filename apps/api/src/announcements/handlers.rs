//! Axum route handlers for announcement selection.

use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::announcements::{render_fragment, select_announcements, TargetingContext};
use crate::errors::AppError;
use crate::models::announcement::{Announcement, AnnouncementScope};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SelectAnnouncementsRequest {
    #[serde(flatten)]
    pub context: TargetingContext,
    /// Evaluation instant; defaults to now.
    pub at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnouncementSummary {
    pub id: Uuid,
    pub title: String,
    pub excerpt: String,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub priority: i32,
    pub scope: AnnouncementScope,
    pub html: String,
}

impl From<&Announcement> for AnnouncementSummary {
    fn from(a: &Announcement) -> Self {
        AnnouncementSummary {
            id: a.id,
            title: a.title.clone(),
            excerpt: a.excerpt.clone(),
            cta_text: a.cta_text.clone(),
            cta_link: a.cta_link.clone(),
            priority: a.priority,
            scope: a.scope,
            html: render_fragment(a),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SelectAnnouncementsResponse {
    pub announcements: Vec<AnnouncementSummary>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/announcements/select
///
/// Returns the announcements eligible for the given subject/city/state,
/// highest priority first, each with its rendered HTML fragment.
pub async fn handle_select_announcements(
    State(state): State<AppState>,
    Json(request): Json<SelectAnnouncementsRequest>,
) -> Result<Json<SelectAnnouncementsResponse>, AppError> {
    let now = request.at.unwrap_or_else(Utc::now);
    let announcements = targeted_summaries(&state, &request.context, now).await?;
    Ok(Json(SelectAnnouncementsResponse { announcements }))
}

/// Shared with the render handler, which appends these after scoring.
pub async fn targeted_summaries(
    state: &AppState,
    ctx: &TargetingContext,
    now: DateTime<Utc>,
) -> Result<Vec<AnnouncementSummary>, AppError> {
    let all = state.source.announcements().await?;
    let selected = select_announcements(&all, ctx, now);
    debug!(
        candidates = all.len(),
        selected = selected.len(),
        "Announcements selected"
    );
    Ok(selected.into_iter().map(AnnouncementSummary::from).collect())
}
