//! Post check-in suggestion selection over an ordered, typed rule set.

mod matcher;
mod trigger;

pub use matcher::{
    Streaks, Suggestion, SuggestionMatcher, DEFAULT_MESSAGE, LOW_MOOD_CEILING, STREAK_WINDOW,
};
pub use trigger::{Clause, Comparison, Trigger};

use serde::{Deserialize, Serialize};

use super::domain::ResourceId;

/// Whether a matching rule ends the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SuggestionPriority {
    High,
    #[default]
    Normal,
}

impl From<String> for SuggestionPriority {
    fn from(value: String) -> Self {
        if value.trim().eq_ignore_ascii_case("high") {
            Self::High
        } else {
            Self::Normal
        }
    }
}

impl From<SuggestionPriority> for String {
    fn from(value: SuggestionPriority) -> Self {
        match value {
            SuggestionPriority::High => "high".to_string(),
            SuggestionPriority::Normal => "normal".to_string(),
        }
    }
}

/// Reference rule pairing a trigger with the message shown after a check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub trigger: Trigger,
    #[serde(default)]
    pub priority: SuggestionPriority,
    pub message: String,
    #[serde(default)]
    pub resources_recommended: Vec<ResourceId>,
    #[serde(default)]
    pub actions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn priority_treats_anything_but_high_as_normal() {
        let rules: Vec<SuggestionRule> = serde_json::from_value(json!([
            { "trigger": {}, "priority": "HIGH", "message": "a" },
            { "trigger": {}, "priority": "medium", "message": "b" },
            { "trigger": {}, "message": "c" }
        ]))
        .expect("rules decode");

        let priorities: Vec<_> = rules.iter().map(|rule| rule.priority).collect();
        assert_eq!(
            priorities,
            vec![
                SuggestionPriority::High,
                SuggestionPriority::Normal,
                SuggestionPriority::Normal
            ]
        );
    }
}
