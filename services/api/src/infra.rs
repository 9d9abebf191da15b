use metrics_exporter_prometheus::PrometheusHandle;
use mindbalance::config::AppConfig;
use mindbalance::error::AppError;
use mindbalance::wellbeing::{JsonFileStore, Period, WellbeingService};
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Flag value wins over `APP_DATA_DIR`.
pub(crate) fn resolve_data_dir(flag: Option<PathBuf>) -> Result<PathBuf, AppError> {
    match flag {
        Some(dir) => Ok(dir),
        None => Ok(AppConfig::load()?.storage.data_dir),
    }
}

pub(crate) fn file_backed_service(data_dir: PathBuf) -> Arc<WellbeingService<JsonFileStore>> {
    if !data_dir.is_dir() {
        warn!(data_dir = %data_dir.display(), "data directory missing; collections start empty");
    }
    info!(data_dir = %data_dir.display(), "opening JSON collections");
    Arc::new(WellbeingService::new(Arc::new(JsonFileStore::new(data_dir))))
}

/// Strict period parsing for CLI flags; the HTTP layer falls back to a week instead.
pub(crate) fn parse_period(raw: &str) -> Result<Period, String> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "week" => Ok(Period::Week),
        "month" => Ok(Period::Month),
        "year" => Ok(Period::Year),
        other => Err(format!("unknown period '{other}' (expected week, month or year)")),
    }
}
