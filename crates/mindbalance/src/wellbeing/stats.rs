use chrono::{Duration, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use super::domain::{CheckIn, Period};

/// Mood difference between window halves needed to call a trend.
pub const TREND_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Improving,
    Declining,
    Stable,
    NoData,
}

impl Trend {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
            Self::NoData => "no data",
        }
    }
}

/// Averages and trend over one rolling window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WellbeingStats {
    pub avg_mood: f64,
    pub avg_energy: f64,
    pub checkins_completed: usize,
    pub trend: Trend,
}

impl WellbeingStats {
    pub const fn empty() -> Self {
        Self {
            avg_mood: 0.0,
            avg_energy: 0.0,
            checkins_completed: 0,
            trend: Trend::NoData,
        }
    }

    pub fn has_data(&self) -> bool {
        self.checkins_completed > 0
    }
}

/// Earliest instant still inside `period` when evaluated at `now`.
pub fn window_start(period: Period, now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::days(period.days())
}

/// A check-in counts from midnight of its calendar day.
pub fn within_window(check_in: &CheckIn, start: NaiveDateTime) -> bool {
    check_in.date.and_time(NaiveTime::MIN) >= start
}

/// Round to one decimal. The exact stored value decides the direction and
/// only exact ties go to even.
///
/// `value * 10.0` alone can land on a false tie (49/20 is stored slightly
/// above 2.45), so the midpoint comparison uses a fused multiply-add, whose
/// sign is exact.
pub fn round_one_decimal(value: f64) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let lower = (value * 10.0).floor();
    let above_midpoint = value.mul_add(10.0, -(lower + 0.5));
    let tenths = if above_midpoint > 0.0 {
        lower + 1.0
    } else if above_midpoint < 0.0 {
        lower
    } else if lower % 2.0 == 0.0 {
        lower
    } else {
        lower + 1.0
    };
    tenths / 10.0
}

/// Averages and trend of the check-ins falling inside `period`.
///
/// The trend compares the first and second half of the window in the order
/// the check-ins were supplied; callers pass them oldest first.
pub fn compute_stats<'a, I>(check_ins: I, period: Period, now: NaiveDateTime) -> WellbeingStats
where
    I: IntoIterator<Item = &'a CheckIn>,
{
    let start = window_start(period, now);
    let recent: Vec<&CheckIn> = check_ins
        .into_iter()
        .filter(|check_in| within_window(check_in, start))
        .collect();

    if recent.is_empty() {
        return WellbeingStats::empty();
    }

    WellbeingStats {
        avg_mood: round_one_decimal(mean(&recent, |c| c.mood)),
        avg_energy: round_one_decimal(mean(&recent, |c| c.energy)),
        checkins_completed: recent.len(),
        trend: trend(&recent),
    }
}

fn mean(check_ins: &[&CheckIn], score: impl Fn(&CheckIn) -> u8) -> f64 {
    if check_ins.is_empty() {
        return 0.0;
    }
    let total: u32 = check_ins.iter().map(|&c| u32::from(score(c))).sum();
    f64::from(total) / check_ins.len() as f64
}

fn trend(check_ins: &[&CheckIn]) -> Trend {
    if check_ins.len() < 2 {
        return Trend::Stable;
    }

    let (first_half, second_half) = check_ins.split_at(check_ins.len() / 2);
    let diff = mean(second_half, |c| c.mood) - mean(first_half, |c| c.mood);

    if diff > TREND_THRESHOLD {
        Trend::Improving
    } else if diff < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    }
}
