use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AnnouncementScope {
    Global,
    State,
    City,
    Subject,
}

impl AnnouncementScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementScope::Global => "global",
            AnnouncementScope::State => "state",
            AnnouncementScope::City => "city",
            AnnouncementScope::Subject => "subject",
        }
    }
}

/// A promotional fragment authored independently of any page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub excerpt: String,
    pub cta_text: Option<String>,
    pub cta_link: Option<String>,
    pub scope: AnnouncementScope,
    #[serde(default)]
    pub target_state_ids: Vec<Uuid>,
    #[serde(default)]
    pub target_city_ids: Vec<Uuid>,
    #[serde(default)]
    pub target_subject_ids: Vec<Uuid>,
    #[serde(default)]
    pub exclude_subject_ids: Vec<Uuid>,
    #[serde(default)]
    pub priority: i32,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

impl Announcement {
    /// Open-ended on either side when a bound is missing.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.start_date.map_or(true, |start| start <= now)
            && self.end_date.map_or(true, |end| now <= end)
    }
}
