//! Personal and manager dashboards composed from the statistics engine.

pub mod admin;
pub mod personal;

pub use admin::{
    compute_admin, department_alerts, AdminDashboard, Alert, AlertSeverity, WorkloadDistribution,
};
pub use personal::{chart_series, insights, personal_dashboard, ChartPoint, PersonalDashboard};
