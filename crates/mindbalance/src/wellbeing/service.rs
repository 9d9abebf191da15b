use std::cmp::Reverse;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::dashboard::{compute_admin, personal_dashboard, AdminDashboard, PersonalDashboard};
use super::domain::{
    CheckIn, CheckInId, CheckInRecord, CheckInSubmission, DepartmentFilter, Period, Resource,
    ResourceId, UserId, UserProfile, MAX_COMMENT_CHARS, MAX_SCORE, MIN_SCORE,
};
use super::repository::{ResourceCatalog, WellbeingRepository};
use super::stats::{window_start, within_window};
use super::store::{DocumentStore, StoreError};
use super::suggestions::SuggestionMatcher;

static CHECK_IN_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_check_in_id(now: NaiveDateTime) -> CheckInId {
    let sequence = CHECK_IN_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CheckInId(format!("ck{}{sequence:04}", now.format("%Y%m%d%H%M%S%6f")))
}

/// One user's check-ins inside a period, newest first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckInHistory {
    pub history: Vec<CheckInRecord>,
    pub total: usize,
}

/// Exact-match filters for the resource library.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceFilter {
    pub category: Option<String>,
    pub difficulty: Option<String>,
}

impl ResourceFilter {
    fn admits(&self, resource: &Resource) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .map_or(true, |category| resource.category == category);
        let difficulty_ok = self
            .difficulty
            .as_deref()
            .map_or(true, |difficulty| resource.difficulty == difficulty);
        category_ok && difficulty_ok
    }
}

/// Service composing the document store, suggestion matcher and dashboards.
pub struct WellbeingService<S> {
    repository: WellbeingRepository<S>,
}

impl<S> WellbeingService<S>
where
    S: DocumentStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            repository: WellbeingRepository::new(store),
        }
    }

    pub fn repository(&self) -> &WellbeingRepository<S> {
        &self.repository
    }

    /// Validate, match a suggestion against prior history, then persist.
    pub fn submit_check_in(
        &self,
        submission: CheckInSubmission,
        now: NaiveDateTime,
    ) -> Result<CheckInRecord, WellbeingError> {
        validate_submission(&submission)?;
        self.require_user(&submission.user_id)?;

        let history: Vec<CheckIn> = self
            .repository
            .check_ins()?
            .into_iter()
            .filter(|record| record.check_in.user_id == submission.user_id)
            .map(|record| record.check_in)
            .collect();

        let check_in = CheckIn {
            id: next_check_in_id(now),
            user_id: submission.user_id,
            date: now.date(),
            time: now.time().with_nanosecond(0).unwrap_or(now.time()),
            mood: submission.mood,
            energy: submission.energy,
            workload: submission.workload,
            comment: submission.comment.unwrap_or_default(),
        };

        let matcher = SuggestionMatcher::new(self.repository.suggestion_rules()?);
        let suggestion = matcher.select(&check_in, &history);
        debug!(
            user = %check_in.user_id,
            rule = ?suggestion.rule_index,
            prior = history.len(),
            "suggestion selected"
        );

        let record = CheckInRecord {
            check_in,
            ai_suggestion: suggestion.message,
            recommended_resources: suggestion.resources_recommended,
            suggested_actions: suggestion.actions,
        };

        self.repository.append_check_in(record.clone())?;
        info!(
            user = %record.check_in.user_id,
            check_in = %record.check_in.id.0,
            "check-in stored"
        );
        Ok(record)
    }

    pub fn check_in_history(
        &self,
        user_id: &UserId,
        period: Period,
        now: NaiveDateTime,
    ) -> Result<CheckInHistory, WellbeingError> {
        self.require_user(user_id)?;

        let start = window_start(period, now);
        let mut history: Vec<CheckInRecord> = self
            .repository
            .check_ins()?
            .into_iter()
            .filter(|record| &record.check_in.user_id == user_id)
            .filter(|record| within_window(&record.check_in, start))
            .collect();
        history.sort_by_key(|record| Reverse((record.check_in.date, record.check_in.time)));

        Ok(CheckInHistory {
            total: history.len(),
            history,
        })
    }

    pub fn personal_dashboard(
        &self,
        user_id: &UserId,
        now: NaiveDateTime,
    ) -> Result<PersonalDashboard, WellbeingError> {
        self.require_user(user_id)?;
        let check_ins = self.check_ins_of(Some(user_id))?;
        Ok(personal_dashboard(&check_ins, now))
    }

    pub fn admin_dashboard(
        &self,
        department: &DepartmentFilter,
        period: Period,
        now: NaiveDateTime,
    ) -> Result<AdminDashboard, WellbeingError> {
        let users = self.repository.users()?;
        let check_ins = self.check_ins_of(None)?;
        let dashboard = compute_admin(&users, &check_ins, department, period, now);

        if !dashboard.alerts.is_empty() {
            warn!(
                department = department.label(),
                alerts = dashboard.alerts.len(),
                "wellbeing alerts raised"
            );
        }
        Ok(dashboard)
    }

    pub fn resources(&self, filter: &ResourceFilter) -> Result<ResourceCatalog, WellbeingError> {
        let ResourceCatalog {
            resources,
            categories,
        } = self.repository.resource_catalog()?;

        Ok(ResourceCatalog {
            resources: resources
                .into_iter()
                .filter(|resource| filter.admits(resource))
                .collect(),
            categories,
        })
    }

    pub fn resource(&self, id: ResourceId) -> Result<Resource, WellbeingError> {
        self.repository
            .resource_catalog()?
            .resources
            .into_iter()
            .find(|resource| resource.id == id)
            .ok_or_else(|| WellbeingError::NotFound(format!("resource {} not found", id.0)))
    }

    fn require_user(&self, user_id: &UserId) -> Result<UserProfile, WellbeingError> {
        self.repository
            .users()?
            .into_iter()
            .find(|user| &user.id == user_id)
            .ok_or_else(|| WellbeingError::NotFound(format!("user {user_id} not found")))
    }

    // Stored order is submission order, which the trend split relies on.
    fn check_ins_of(&self, user_id: Option<&UserId>) -> Result<Vec<CheckIn>, WellbeingError> {
        Ok(self
            .repository
            .check_ins()?
            .into_iter()
            .map(|record| record.check_in)
            .filter(|check_in| user_id.map_or(true, |id| &check_in.user_id == id))
            .collect())
    }
}

fn validate_submission(submission: &CheckInSubmission) -> Result<(), WellbeingError> {
    if submission.user_id.0.trim().is_empty() {
        return Err(WellbeingError::InvalidInput(
            "userId must not be empty".to_string(),
        ));
    }

    for (field, value) in [("mood", submission.mood), ("energy", submission.energy)] {
        if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
            return Err(WellbeingError::InvalidInput(format!(
                "{field} must be between {MIN_SCORE} and {MAX_SCORE}, got {value}"
            )));
        }
    }

    if let Some(comment) = &submission.comment {
        let length = comment.chars().count();
        if length > MAX_COMMENT_CHARS {
            return Err(WellbeingError::InvalidInput(format!(
                "comment exceeds {MAX_COMMENT_CHARS} characters ({length})"
            )));
        }
    }

    Ok(())
}

/// Error raised by the wellbeing service.
#[derive(Debug, thiserror::Error)]
pub enum WellbeingError {
    #[error("{0}")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}
