use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// Lowest accepted mood or energy score.
pub const MIN_SCORE: u8 = 1;
/// Highest accepted mood or energy score.
pub const MAX_SCORE: u8 = 5;
/// Longest free-text comment accepted on a check-in, in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Identifier wrapper for people submitting check-ins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identifier wrapper for stored check-ins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckInId(pub String);

/// Numeric identifier of a library resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(pub u32);

/// Self-reported workload for the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Workload {
    Light,
    Adequate,
    Heavy,
}

impl Workload {
    pub const fn ordered() -> [Self; 3] {
        [Self::Light, Self::Adequate, Self::Heavy]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Adequate => "adequate",
            Self::Heavy => "heavy",
        }
    }
}

impl fmt::Display for Workload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One wellbeing record as captured at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckIn {
    pub id: CheckInId,
    pub user_id: UserId,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub mood: u8,
    pub energy: u8,
    pub workload: Workload,
    #[serde(default)]
    pub comment: String,
}

impl CheckIn {
    pub fn is_heavy(&self) -> bool {
        self.workload == Workload::Heavy
    }
}

/// Persisted check-in enriched with the suggestion selected at submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    #[serde(flatten)]
    pub check_in: CheckIn,
    #[serde(default)]
    pub ai_suggestion: String,
    #[serde(default)]
    pub recommended_resources: Vec<ResourceId>,
    #[serde(default)]
    pub suggested_actions: Vec<String>,
}

/// Payload accepted from the check-in form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInSubmission {
    pub user_id: UserId,
    pub mood: u8,
    pub energy: u8,
    pub workload: Workload,
    #[serde(default)]
    pub comment: Option<String>,
}

/// Directory entry for someone allowed to submit check-ins.
///
/// Unknown stored fields (credentials in particular) are dropped on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: UserId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

/// Library item that suggestions can point at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: ResourceId,
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub difficulty: String,
    #[serde(default)]
    pub duration: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub views: Option<u32>,
}

/// Rolling window used by statistics and history queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    #[default]
    Week,
    Month,
    Year,
}

impl Period {
    pub const fn days(self) -> i64 {
        match self {
            Self::Week => 7,
            Self::Month => 30,
            Self::Year => 365,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Parse a query value, falling back to a week for anything unrecognised.
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("month") => Self::Month,
            Some("year") => Self::Year,
            _ => Self::Week,
        }
    }
}

/// Department selection for admin aggregates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DepartmentFilter {
    #[default]
    All,
    Named(String),
}

impl DepartmentFilter {
    pub fn from_query(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::All,
            Some(value) if value.eq_ignore_ascii_case("all") => Self::All,
            Some(value) => Self::Named(value.to_string()),
        }
    }

    pub fn admits(&self, department: &str) -> bool {
        match self {
            Self::All => true,
            Self::Named(name) => name == department,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::All => "all",
            Self::Named(name) => name,
        }
    }
}
