use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::models::announcement::{Announcement, AnnouncementScope};

/// Who is asking. Every field is optional; a missing id never matches a
/// scope that needs it.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TargetingContext {
    pub subject_id: Option<Uuid>,
    pub city_id: Option<Uuid>,
    pub state_id: Option<Uuid>,
}

/// Announcements eligible for `ctx` at `now`, highest priority first.
///
/// Exclusion is checked before scope, so an excluded subject never sees the
/// announcement even when it is also targeted.
pub fn select_announcements<'a>(
    items: &'a [Announcement],
    ctx: &TargetingContext,
    now: DateTime<Utc>,
) -> Vec<&'a Announcement> {
    let mut selected: Vec<&Announcement> = items
        .iter()
        .filter(|a| a.is_live_at(now))
        .filter(|a| !is_excluded(a, ctx))
        .filter(|a| scope_matches(a, ctx))
        .collect();

    selected.sort_by(|a, b| b.priority.cmp(&a.priority).then(a.id.cmp(&b.id)));
    selected
}

fn is_excluded(a: &Announcement, ctx: &TargetingContext) -> bool {
    ctx.subject_id
        .is_some_and(|id| a.exclude_subject_ids.contains(&id))
}

fn scope_matches(a: &Announcement, ctx: &TargetingContext) -> bool {
    let (targets, wanted) = match a.scope {
        AnnouncementScope::Global => return true,
        AnnouncementScope::State => (&a.target_state_ids, ctx.state_id),
        AnnouncementScope::City => (&a.target_city_ids, ctx.city_id),
        AnnouncementScope::Subject => (&a.target_subject_ids, ctx.subject_id),
    };

    if targets.is_empty() {
        warn!(
            announcement_id = %a.id,
            scope = a.scope.as_str(),
            "Scoped announcement has no targets; it will never be shown"
        );
        return false;
    }
    wanted.is_some_and(|id| targets.contains(&id))
}
