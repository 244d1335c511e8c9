//! Remote home-check assessments.
//!
//! A raw payload passes through the intake guard, is scored by the stateless
//! [`ScoringEngine`], persisted through an [`AssessmentRepository`], rendered by a
//! [`ReportRenderer`], and delivered by a [`NotificationDispatcher`]. Only the engine
//! carries domain logic; the remaining modules are adapters behind traits.

pub mod domain;
pub mod intake;
pub mod notify;
pub mod questionnaire;
pub mod report;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    AssessmentId, AssessmentRecord, AssessmentSubmission, PatientDetails, ResponseSet,
};
pub use intake::{IntakeGuard, ValidationFailure};
pub use notify::{
    compose_notification, Notification, NotificationDispatcher, NotificationError,
    OutboxDispatcher,
};
pub use questionnaire::{find_question, QuestionDefinition, QUESTIONNAIRE};
pub use report::{ReportDocument, ReportError, ReportInput, ReportRenderer, TextReportRenderer};
pub use repository::{AssessmentRepository, FileAssessmentRepository, RepositoryError};
pub use router::assessment_router;
pub use scoring::{
    advise, advise_after, aggregate, CoverageError, CoverageGap, Impact, ImpactTable,
    PreviousTier, ScoreResult, ScoringEngine, Tier,
};
pub use service::{AssessmentOutcome, AssessmentService, AssessmentServiceError, ScoredAssessment};
