//! Wellbeing check-in core: suggestion matching, rolling statistics and
//! department alerting over an injected document store.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod wellbeing;
