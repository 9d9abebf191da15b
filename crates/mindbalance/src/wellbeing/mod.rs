//! Check-in intake, suggestion matching and wellbeing dashboards.
//!
//! Everything reads and writes through a [`DocumentStore`] handed in by the
//! caller, so the HTTP service, the CLI reports and the tests can each pick
//! their own backing store.

pub mod dashboard;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;
pub mod stats;
pub mod store;
pub mod suggestions;

#[cfg(test)]
mod tests;

pub use dashboard::{AdminDashboard, Alert, AlertSeverity, PersonalDashboard, WorkloadDistribution};
pub use domain::{
    CheckIn, CheckInId, CheckInRecord, CheckInSubmission, DepartmentFilter, Period, Resource,
    ResourceId, UserId, UserProfile, Workload,
};
pub use repository::{ResourceCatalog, WellbeingRepository};
pub use router::wellbeing_router;
pub use service::{CheckInHistory, ResourceFilter, WellbeingError, WellbeingService};
pub use stats::{Trend, WellbeingStats};
pub use store::{Collection, DocumentStore, JsonFileStore, MemoryStore, StoreError};
pub use suggestions::{Suggestion, SuggestionMatcher, SuggestionPriority, SuggestionRule};
