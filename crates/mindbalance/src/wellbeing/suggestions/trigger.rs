use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::super::domain::{CheckIn, Workload};
use super::matcher::{Streaks, LOW_MOOD_CEILING};

/// Inclusive score bound parsed from `"<=N"` or `">=N"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    AtMost(u8),
    AtLeast(u8),
}

impl Comparison {
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Some(bound) = raw.strip_prefix("<=") {
            bound.trim().parse().ok().map(Self::AtMost)
        } else if let Some(bound) = raw.strip_prefix(">=") {
            bound.trim().parse().ok().map(Self::AtLeast)
        } else {
            None
        }
    }

    pub fn admits(self, value: u8) -> bool {
        match self {
            Self::AtMost(bound) => value <= bound,
            Self::AtLeast(bound) => value >= bound,
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AtMost(bound) => write!(f, "<={bound}"),
            Self::AtLeast(bound) => write!(f, ">={bound}"),
        }
    }
}

/// A trigger clause as decided when the rule set was loaded.
///
/// An unparsable clause keeps its raw value so the rule can be written back
/// unchanged, and it never passes.
#[derive(Debug, Clone, PartialEq)]
pub enum Clause<T> {
    Valid(T),
    Unparsable(Value),
}

impl<T> Clause<T> {
    fn passes(&self, check: impl FnOnce(&T) -> bool) -> bool {
        match self {
            Clause::Valid(value) => check(value),
            Clause::Unparsable(_) => false,
        }
    }

    pub fn is_unparsable(&self) -> bool {
        matches!(self, Clause::Unparsable(_))
    }
}

/// Predicate attached to a suggestion rule. Absent clauses are ignored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawTrigger", into = "RawTrigger")]
pub struct Trigger {
    pub mood: Option<Clause<Comparison>>,
    pub energy: Option<Clause<Comparison>>,
    pub workload: Option<Clause<Workload>>,
    pub consecutive_days: Option<Clause<u32>>,
}

impl Trigger {
    /// Every present clause must pass.
    pub fn is_satisfied_by(&self, check_in: &CheckIn, streaks: &Streaks) -> bool {
        let mood_ok = self
            .mood
            .as_ref()
            .map_or(true, |clause| clause.passes(|cmp| cmp.admits(check_in.mood)));
        let energy_ok = self
            .energy
            .as_ref()
            .map_or(true, |clause| clause.passes(|cmp| cmp.admits(check_in.energy)));
        let workload_ok = self
            .workload
            .as_ref()
            .map_or(true, |clause| clause.passes(|wanted| *wanted == check_in.workload));
        let streak_ok = self.consecutive_days.as_ref().map_or(true, |clause| {
            clause.passes(|required| streak_requirement_met(*required, check_in, streaks))
        });

        mood_ok && energy_ok && workload_ok && streak_ok
    }

    pub fn has_unparsable_clause(&self) -> bool {
        self.mood.as_ref().is_some_and(Clause::is_unparsable)
            || self.energy.as_ref().is_some_and(Clause::is_unparsable)
            || self.workload.as_ref().is_some_and(Clause::is_unparsable)
            || self
                .consecutive_days
                .as_ref()
                .is_some_and(Clause::is_unparsable)
    }
}

// Passes vacuously when the check-in is neither heavy nor low-mood.
fn streak_requirement_met(required: u32, check_in: &CheckIn, streaks: &Streaks) -> bool {
    if check_in.is_heavy() && streaks.heavy_workload_days < required {
        return false;
    }
    if check_in.mood <= LOW_MOOD_CEILING && streaks.low_mood_days < required {
        return false;
    }
    true
}

/// Stored shape of a trigger: loose JSON values keyed by clause name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTrigger {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mood: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    energy: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    workload: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    consecutive_days: Option<Value>,
}

fn comparison_clause(raw: Value) -> Clause<Comparison> {
    match raw.as_str().and_then(Comparison::parse) {
        Some(comparison) => Clause::Valid(comparison),
        None => Clause::Unparsable(raw),
    }
}

fn workload_clause(raw: Value) -> Clause<Workload> {
    match serde_json::from_value::<Workload>(raw.clone()) {
        Ok(workload) => Clause::Valid(workload),
        Err(_) => Clause::Unparsable(raw),
    }
}

fn days_clause(raw: Value) -> Clause<u32> {
    match raw.as_u64().and_then(|days| u32::try_from(days).ok()) {
        Some(days) => Clause::Valid(days),
        None => Clause::Unparsable(raw),
    }
}

fn raw_value<T>(clause: Clause<T>, render: impl FnOnce(T) -> Value) -> Value {
    match clause {
        Clause::Valid(value) => render(value),
        Clause::Unparsable(raw) => raw,
    }
}

impl From<RawTrigger> for Trigger {
    fn from(raw: RawTrigger) -> Self {
        Self {
            mood: raw.mood.map(comparison_clause),
            energy: raw.energy.map(comparison_clause),
            workload: raw.workload.map(workload_clause),
            consecutive_days: raw.consecutive_days.map(days_clause),
        }
    }
}

impl From<Trigger> for RawTrigger {
    fn from(trigger: Trigger) -> Self {
        let comparison = |cmp: Comparison| Value::String(cmp.to_string());
        Self {
            mood: trigger.mood.map(|clause| raw_value(clause, comparison)),
            energy: trigger.energy.map(|clause| raw_value(clause, comparison)),
            workload: trigger
                .workload
                .map(|clause| raw_value(clause, |w| Value::String(w.label().to_string()))),
            consecutive_days: trigger
                .consecutive_days
                .map(|clause| raw_value(clause, Value::from)),
        }
    }
}
