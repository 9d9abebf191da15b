use std::cmp::Reverse;
use std::ops::ControlFlow;

use serde::Serialize;

use super::super::domain::{CheckIn, ResourceId};
use super::{SuggestionPriority, SuggestionRule};

/// Number of most recent history entries inspected for streaks.
pub const STREAK_WINDOW: usize = 7;
/// Moods at or below this value count toward the low-mood streak.
pub const LOW_MOOD_CEILING: u8 = 2;

pub const DEFAULT_MESSAGE: &str =
    "Thanks for checking in! Keep taking care of your wellbeing.";

/// Consecutive-day counters taken from the most recent prior check-ins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Streaks {
    pub heavy_workload_days: u32,
    pub low_mood_days: u32,
}

impl Streaks {
    /// Count unbroken runs starting at the newest entry of the rolling window.
    ///
    /// Entries are ordered newest first by date, then time; the first entry
    /// failing a predicate ends that run.
    pub fn from_history<'h, I>(history: I) -> Self
    where
        I: IntoIterator<Item = &'h CheckIn>,
    {
        let mut recent: Vec<&CheckIn> = history.into_iter().collect();
        recent.sort_by_key(|entry| Reverse((entry.date, entry.time)));
        recent.truncate(STREAK_WINDOW);

        let run = |predicate: fn(&CheckIn) -> bool| {
            recent.iter().take_while(|entry| predicate(entry)).count() as u32
        };

        Self {
            heavy_workload_days: run(CheckIn::is_heavy),
            low_mood_days: run(|entry| entry.mood <= LOW_MOOD_CEILING),
        }
    }
}

/// Suggestion attached to a check-in; either a rule's content or the default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Position of the selected rule in the rule set, `None` for the default.
    pub rule_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rule_id: Option<String>,
    pub message: String,
    pub resources_recommended: Vec<ResourceId>,
    pub actions: Vec<String>,
}

impl Suggestion {
    pub fn fallback() -> Self {
        Self {
            rule_index: None,
            rule_id: None,
            message: DEFAULT_MESSAGE.to_string(),
            resources_recommended: Vec::new(),
            actions: Vec::new(),
        }
    }

    fn from_rule(index: usize, rule: &SuggestionRule) -> Self {
        Self {
            rule_index: Some(index),
            rule_id: rule.id.clone(),
            message: rule.message.clone(),
            resources_recommended: rule.resources_recommended.clone(),
            actions: rule.actions.clone(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.rule_index.is_none()
    }
}

/// Stateless selector over an ordered rule set.
#[derive(Debug, Clone, Default)]
pub struct SuggestionMatcher {
    rules: Vec<SuggestionRule>,
}

impl SuggestionMatcher {
    pub fn new(rules: Vec<SuggestionRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[SuggestionRule] {
        &self.rules
    }

    /// Pick exactly one suggestion for `check_in` given the user's prior history.
    pub fn select<'h, I>(&self, check_in: &CheckIn, history: I) -> Suggestion
    where
        I: IntoIterator<Item = &'h CheckIn>,
    {
        let streaks = Streaks::from_history(history);
        match self.select_with_streaks(check_in, &streaks) {
            Some((index, rule)) => Suggestion::from_rule(index, rule),
            None => Suggestion::fallback(),
        }
    }

    /// Single pass over the rules: a high-priority match stops the scan,
    /// otherwise the last match seen wins.
    pub fn select_with_streaks(
        &self,
        check_in: &CheckIn,
        streaks: &Streaks,
    ) -> Option<(usize, &SuggestionRule)> {
        let scan = self
            .rules
            .iter()
            .enumerate()
            .filter(|(_, rule)| rule.trigger.is_satisfied_by(check_in, streaks))
            .try_fold(None, |_, (index, rule)| match rule.priority {
                SuggestionPriority::High => ControlFlow::Break((index, rule)),
                SuggestionPriority::Normal => ControlFlow::Continue(Some((index, rule))),
            });

        match scan {
            ControlFlow::Break(high) => Some(high),
            ControlFlow::Continue(last) => last,
        }
    }
}
