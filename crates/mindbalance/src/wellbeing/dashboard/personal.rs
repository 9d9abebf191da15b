use std::cmp::Reverse;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::super::domain::{CheckIn, Period};
use super::super::stats::{compute_stats, Trend, WellbeingStats};

/// Most recent check-ins plotted on the personal chart.
pub const CHART_POINTS: usize = 14;
/// Weekly check-ins needed for the consistency note.
pub const CONSISTENT_WEEK: usize = 5;
/// Average mood or energy below which a low-score note is shown.
pub const LOW_SCORE: f64 = 3.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub mood: u8,
    pub energy: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalDashboard {
    pub week_summary: WellbeingStats,
    pub month_summary: WellbeingStats,
    pub chart_series: Vec<ChartPoint>,
    pub insights: Vec<String>,
}

/// Build the personal dashboard from one user's check-ins in stored order.
pub fn personal_dashboard(check_ins: &[CheckIn], now: NaiveDateTime) -> PersonalDashboard {
    let week_summary = compute_stats(check_ins, Period::Week, now);
    let month_summary = compute_stats(check_ins, Period::Month, now);

    PersonalDashboard {
        week_summary,
        month_summary,
        chart_series: chart_series(check_ins),
        insights: insights(&week_summary),
    }
}

/// Last [`CHART_POINTS`] check-ins, oldest first.
pub fn chart_series(check_ins: &[CheckIn]) -> Vec<ChartPoint> {
    let mut recent: Vec<&CheckIn> = check_ins.iter().collect();
    recent.sort_by_key(|check_in| Reverse((check_in.date, check_in.time)));
    recent.truncate(CHART_POINTS);
    recent
        .into_iter()
        .rev()
        .map(|check_in| ChartPoint {
            date: check_in.date,
            mood: check_in.mood,
            energy: check_in.energy,
        })
        .collect()
}

/// Threshold notes on the weekly summary. Never empty.
///
/// An empty week averages 0 and so gets both low-score notes.
pub fn insights(week: &WellbeingStats) -> Vec<String> {
    let mut notes = Vec::new();

    match week.trend {
        Trend::Improving => notes.push(format!(
            "Your mood is on the rise this week (average {:.1}/5). Keep it up!",
            week.avg_mood
        )),
        Trend::Declining => notes.push(
            "Your wellbeing dipped lately. How about making extra room for self-care this week?"
                .to_string(),
        ),
        Trend::Stable | Trend::NoData => {}
    }

    if week.checkins_completed >= CONSISTENT_WEEK {
        notes.push("You've been checking in consistently. Well done!".to_string());
    }

    if week.avg_mood < LOW_SCORE {
        notes.push(
            "Your mood has been low this week. Consider talking to someone you trust or exploring the support resources."
                .to_string(),
        );
    }

    if week.avg_energy < LOW_SCORE {
        notes.push(
            "Your energy is below ideal. Review your sleep, meals and breaks.".to_string(),
        );
    }

    if notes.is_empty() {
        notes.push("Keep checking in and looking after yourself. Small habits add up!".to_string());
    }

    notes
}
