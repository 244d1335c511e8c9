use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::domain::{AssessmentId, AssessmentRecord, AssessmentSubmission};
use super::intake::{IntakeGuard, ValidationFailure};
use super::notify::{compose_notification, NotificationDispatcher};
use super::questionnaire::QuestionDefinition;
use super::report::{ReportDocument, ReportInput, ReportRenderer};
use super::repository::{AssessmentRepository, RepositoryError};
use super::scoring::{ScoreResult, ScoringEngine};

/// Scored submission that has not been persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredAssessment {
    pub submission: AssessmentSubmission,
    pub scores: ScoreResult,
    pub care_plan: &'static str,
}

/// Result of processing one assessment end to end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssessmentOutcome {
    pub assessment_id: AssessmentId,
    pub scores: ScoreResult,
    pub care_plan: String,
    pub email_sent: bool,
}

/// Service composing the intake guard, scoring engine, repository, and delivery seams.
pub struct AssessmentService<R, N> {
    guard: IntakeGuard,
    engine: Arc<ScoringEngine>,
    repository: Arc<R>,
    dispatcher: Arc<N>,
    renderer: Box<dyn ReportRenderer>,
}

impl<R, N> AssessmentService<R, N>
where
    R: AssessmentRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    pub fn new(
        engine: ScoringEngine,
        repository: Arc<R>,
        dispatcher: Arc<N>,
        renderer: Box<dyn ReportRenderer>,
    ) -> Self {
        Self {
            guard: IntakeGuard::new(engine.questions()),
            engine: Arc::new(engine),
            repository,
            dispatcher,
            renderer,
        }
    }

    pub fn questions(&self) -> &'static [QuestionDefinition] {
        self.engine.questions()
    }

    /// Validate and score a payload without persisting or notifying.
    pub fn score(&self, payload: &Value) -> Result<ScoredAssessment, ValidationFailure> {
        let submission = self.guard.submission_from_payload(payload)?;
        let scores = self.engine.score(&submission.responses);
        let care_plan = self
            .engine
            .advise(scores.tier, submission.patient.previous_tier.as_ref());

        Ok(ScoredAssessment {
            submission,
            scores,
            care_plan,
        })
    }

    /// Score, persist, render, and notify.
    ///
    /// Only validation and persistence failures abort; report and notification
    /// failures are logged and reflected in `email_sent`.
    pub fn process(&self, payload: &Value) -> Result<AssessmentOutcome, AssessmentServiceError> {
        let ScoredAssessment {
            submission,
            scores,
            care_plan,
        } = self.score(payload)?;

        let record = AssessmentRecord {
            assessment_id: AssessmentId::generate(),
            timestamp: submission.timestamp.clone(),
            processed_at: Utc::now(),
            patient: submission.patient.clone(),
            responses: submission.responses.clone(),
            scores,
            care_plan: care_plan.to_string(),
            input: payload.clone(),
        };
        self.repository.insert(&record)?;

        info!(
            assessment_id = %record.assessment_id,
            tier = %scores.tier,
            insight_score = scores.insight_score,
            "assessment processed"
        );

        let report = self.render_report(&record, &submission);
        let notification = compose_notification(&submission, &scores, care_plan, report);
        let email_sent = match self.dispatcher.dispatch(&notification) {
            Ok(()) => true,
            Err(err) => {
                warn!(assessment_id = %record.assessment_id, error = %err, "notification not delivered");
                false
            }
        };

        Ok(AssessmentOutcome {
            assessment_id: record.assessment_id,
            scores,
            care_plan: record.care_plan,
            email_sent,
        })
    }

    fn render_report(
        &self,
        record: &AssessmentRecord,
        submission: &AssessmentSubmission,
    ) -> Option<ReportDocument> {
        let input = ReportInput {
            assessment_id: &record.assessment_id,
            submission,
            scores: &record.scores,
            care_plan: &record.care_plan,
            questions: self.engine.questions(),
        };

        let report = match self.renderer.render(&input) {
            Ok(report) => report,
            Err(err) => {
                warn!(assessment_id = %record.assessment_id, error = %err, "report rendering failed");
                return None;
            }
        };

        if let Err(err) = self.repository.store_report(&record.assessment_id, &report) {
            warn!(assessment_id = %record.assessment_id, error = %err, "report not stored");
        }

        Some(report)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationFailure),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
