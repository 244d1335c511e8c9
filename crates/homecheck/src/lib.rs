//! Remote home-check assessments: questionnaire scoring, tier transitions, and the
//! persistence, reporting, and notification adapters that surround them.

pub mod assessment;
pub mod config;
pub mod error;
pub mod telemetry;
