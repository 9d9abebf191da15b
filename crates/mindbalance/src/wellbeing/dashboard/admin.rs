use std::collections::{BTreeSet, HashMap, HashSet};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::super::domain::{CheckIn, DepartmentFilter, Period, UserId, UserProfile, Workload};
use super::super::stats::{compute_stats, round_one_decimal, within_window, window_start};
use super::super::stats::{Trend, WellbeingStats};

/// Department average mood below which a high-severity alert is raised.
pub const HIGH_ALERT_MOOD: f64 = 2.0;
/// Department average mood below which at least a medium alert is raised.
pub const MEDIUM_ALERT_MOOD: f64 = 2.5;
/// Department alerts always look at this window, whatever the request asked for.
pub const ALERT_PERIOD: Period = Period::Week;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    High,
    Medium,
}

impl AlertSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
        }
    }
}

/// Department-level risk signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub team: String,
    pub reason: String,
    pub severity: AlertSeverity,
}

/// Share of each workload answer, in percent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkloadDistribution {
    pub light: f64,
    pub adequate: f64,
    pub heavy: f64,
}

impl WorkloadDistribution {
    pub fn from_check_ins<'a, I>(check_ins: I) -> Self
    where
        I: IntoIterator<Item = &'a CheckIn>,
    {
        let mut counts: HashMap<Workload, usize> = HashMap::new();
        for check_in in check_ins {
            *counts.entry(check_in.workload).or_default() += 1;
        }

        let total: usize = counts.values().sum();
        if total == 0 {
            return Self::default();
        }

        let share = |workload: Workload| {
            let count = counts.get(&workload).copied().unwrap_or(0);
            round_one_decimal(count as f64 / total as f64 * 100.0)
        };

        Self {
            light: share(Workload::Light),
            adequate: share(Workload::Adequate),
            heavy: share(Workload::Heavy),
        }
    }

    pub fn share(&self, workload: Workload) -> f64 {
        match workload {
            Workload::Light => self.light,
            Workload::Adequate => self.adequate,
            Workload::Heavy => self.heavy,
        }
    }
}

/// Anonymised aggregate shown to managers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminDashboard {
    pub overall_wellbeing: f64,
    pub participation_rate: f64,
    pub alerts: Vec<Alert>,
    pub trends: WellbeingStats,
    pub workload_distribution: WorkloadDistribution,
}

fn department_index(users: &[UserProfile]) -> HashMap<&UserId, &str> {
    users
        .iter()
        .map(|user| (&user.id, user.department.as_str()))
        .collect()
}

/// Aggregate the check-ins of `department` (or everyone) over `period`.
///
/// Participation counts distinct submitters of the department across all
/// stored history against the whole user directory. Alerts cover every
/// department independently of the requested filter.
pub fn compute_admin(
    users: &[UserProfile],
    check_ins: &[CheckIn],
    department: &DepartmentFilter,
    period: Period,
    now: NaiveDateTime,
) -> AdminDashboard {
    let departments = department_index(users);
    let selected: Vec<&CheckIn> = check_ins
        .iter()
        .filter(|check_in| match department {
            DepartmentFilter::All => true,
            DepartmentFilter::Named(_) => departments
                .get(&check_in.user_id)
                .is_some_and(|owner| department.admits(owner)),
        })
        .collect();

    let trends = compute_stats(selected.iter().copied(), period, now);

    let submitters: HashSet<&UserId> = selected.iter().map(|check_in| &check_in.user_id).collect();
    let participation_rate = if users.is_empty() {
        0.0
    } else {
        round_one_decimal(submitters.len() as f64 / users.len() as f64 * 100.0)
    };

    let start = window_start(period, now);
    let workload_distribution = WorkloadDistribution::from_check_ins(
        selected
            .iter()
            .copied()
            .filter(|check_in| within_window(check_in, start)),
    );

    AdminDashboard {
        overall_wellbeing: trends.avg_mood,
        participation_rate,
        alerts: department_alerts(users, check_ins, now),
        trends,
        workload_distribution,
    }
}

/// Week-window alerts for every department named in the user directory,
/// ordered by department name. A department without check-ins in the week
/// averages 0 and is flagged high.
pub fn department_alerts(
    users: &[UserProfile],
    check_ins: &[CheckIn],
    now: NaiveDateTime,
) -> Vec<Alert> {
    let departments = department_index(users);
    let names: BTreeSet<&str> = users.iter().map(|user| user.department.as_str()).collect();

    names
        .into_iter()
        .flat_map(|name| {
            let stats = compute_stats(
                check_ins.iter().filter(|check_in| {
                    departments.get(&check_in.user_id).copied() == Some(name)
                }),
                ALERT_PERIOD,
                now,
            );
            alerts_for(name, &stats)
        })
        .collect()
}

fn alerts_for(team: &str, stats: &WellbeingStats) -> Vec<Alert> {
    let mut alerts = Vec::new();

    if stats.avg_mood < MEDIUM_ALERT_MOOD {
        let severity = if stats.avg_mood < HIGH_ALERT_MOOD {
            AlertSeverity::High
        } else {
            AlertSeverity::Medium
        };
        alerts.push(Alert {
            team: team.to_string(),
            reason: format!("Wellbeing below target (average mood {:.1})", stats.avg_mood),
            severity,
        });
    }

    if stats.trend == Trend::Declining {
        alerts.push(Alert {
            team: team.to_string(),
            reason: "Wellbeing trending down".to_string(),
            severity: AlertSeverity::Medium,
        });
    }

    alerts
}
