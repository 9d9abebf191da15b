use crate::infra::{file_backed_service, parse_period, resolve_data_dir};
use chrono::Local;
use clap::Args;
use mindbalance::error::AppError;
use mindbalance::wellbeing::dashboard::{AdminDashboard, PersonalDashboard};
use mindbalance::wellbeing::{DepartmentFilter, Period, UserId, WellbeingStats, Workload};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct PersonalReportArgs {
    /// Identifier of the person whose check-ins are summarised
    #[arg(long)]
    pub(crate) user: String,
    /// Directory holding the JSON collections (defaults to APP_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct AdminReportArgs {
    /// Restrict aggregates to one department (alerts always cover every department)
    #[arg(long)]
    pub(crate) department: Option<String>,
    /// Rolling window: week, month or year
    #[arg(long, value_parser = parse_period, default_value = "week")]
    pub(crate) period: Period,
    /// Directory holding the JSON collections (defaults to APP_DATA_DIR)
    #[arg(long)]
    pub(crate) data_dir: Option<PathBuf>,
}

pub(crate) fn run_personal_report(args: PersonalReportArgs) -> Result<(), AppError> {
    let service = file_backed_service(resolve_data_dir(args.data_dir)?);
    let user = UserId(args.user);
    let dashboard = service.personal_dashboard(&user, Local::now().naive_local())?;

    for line in personal_lines(&user, &dashboard) {
        println!("{line}");
    }
    Ok(())
}

pub(crate) fn run_admin_report(args: AdminReportArgs) -> Result<(), AppError> {
    let service = file_backed_service(resolve_data_dir(args.data_dir)?);
    let department = DepartmentFilter::from_query(args.department.as_deref());
    let dashboard =
        service.admin_dashboard(&department, args.period, Local::now().naive_local())?;

    for line in admin_lines(&department, args.period, &dashboard) {
        println!("{line}");
    }
    Ok(())
}

fn summary_line(label: &str, stats: &WellbeingStats) -> String {
    if !stats.has_data() {
        return format!("- {label}: no check-ins");
    }
    format!(
        "- {label}: mood {:.1}/5 | energy {:.1}/5 | {} check-ins | trend {}",
        stats.avg_mood,
        stats.avg_energy,
        stats.checkins_completed,
        stats.trend.label()
    )
}

fn personal_lines(user: &UserId, dashboard: &PersonalDashboard) -> Vec<String> {
    let mut lines = vec![
        format!("Wellbeing summary for user {user}"),
        summary_line("Last 7 days", &dashboard.week_summary),
        summary_line("Last 30 days", &dashboard.month_summary),
    ];

    if !dashboard.chart_series.is_empty() {
        lines.push("Recent check-ins:".to_string());
        lines.extend(dashboard.chart_series.iter().map(|point| {
            format!(
                "  - {} mood {} energy {}",
                point.date.format("%Y-%m-%d"),
                point.mood,
                point.energy
            )
        }));
    }

    lines.push("Insights:".to_string());
    lines.extend(dashboard.insights.iter().map(|note| format!("  - {note}")));
    lines
}

fn admin_lines(
    department: &DepartmentFilter,
    period: Period,
    dashboard: &AdminDashboard,
) -> Vec<String> {
    let distribution = &dashboard.workload_distribution;
    let workload = Workload::ordered()
        .into_iter()
        .map(|kind| format!("{} {:.1}%", kind.label(), distribution.share(kind)))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut lines = vec![
        format!(
            "Team wellbeing for {} (last {})",
            department.label(),
            period.label()
        ),
        format!("- Overall wellbeing: {:.1}/5", dashboard.overall_wellbeing),
        format!("- Participation: {:.1}%", dashboard.participation_rate),
        summary_line("Trend", &dashboard.trends),
        format!("- Workload: {workload}"),
        "Alerts:".to_string(),
    ];

    if dashboard.alerts.is_empty() {
        lines.push("  - none".to_string());
    } else {
        lines.extend(dashboard.alerts.iter().map(|alert| {
            format!(
                "  - [{}] {}: {}",
                alert.severity.label(),
                alert.team,
                alert.reason
            )
        }));
    }
    lines
}
