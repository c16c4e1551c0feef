use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The person being profiled on a page (typically a local representative).
/// Owned by the authoring system; read-only for the duration of a render.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub id: Uuid,
    pub name: String,
    pub display_name: Option<String>,
    /// Professional designation shown next to the name, e.g. "Certified Residential Specialist".
    pub designation: Option<String>,
    pub city_id: Option<Uuid>,
    pub state_id: Option<Uuid>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub bio: Option<String>,
}

impl SubjectProfile {
    /// Display name if set and non-blank, otherwise the legal name.
    pub fn display(&self) -> &str {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.name)
    }

    pub fn has_bio(&self) -> bool {
        self.bio.as_deref().is_some_and(|b| !b.trim().is_empty())
    }
}
