use std::sync::{Arc, Mutex};

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::{json, Value};

use crate::assessment::domain::{AssessmentId, AssessmentRecord, ResponseSet};
use crate::assessment::notify::{Notification, NotificationDispatcher, NotificationError};
use crate::assessment::questionnaire::QUESTIONNAIRE;
use crate::assessment::report::{
    ReportDocument, ReportError, ReportInput, ReportRenderer, TextReportRenderer,
};
use crate::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::assessment::scoring::ScoringEngine;
use crate::assessment::service::AssessmentService;

/// Every question answered with its first (zero-impact) option.
pub(super) fn best_responses() -> ResponseSet {
    QUESTIONNAIRE
        .iter()
        .map(|question| (question.name.to_string(), question.options[0].to_string()))
        .collect()
}

/// Every question answered with its last (highest-impact) option.
pub(super) fn worst_responses() -> ResponseSet {
    QUESTIONNAIRE
        .iter()
        .map(|question| {
            let last = question.options[question.options.len() - 1];
            (question.name.to_string(), last.to_string())
        })
        .collect()
}

pub(super) fn payload(responses: &ResponseSet, previous_tier: Option<&str>) -> Value {
    let mut patient = json!({
        "email": "margaret@example.org",
        "name": "Margaret Hale",
        "age": 81,
        "gender": "female",
    });
    if let Some(tier) = previous_tier {
        patient["previous_tier"] = json!(tier);
    }

    json!({
        "timestamp": "2025-10-01T09:30:00",
        "patient": patient,
        "responses": responses,
    })
}

pub(super) fn engine() -> ScoringEngine {
    ScoringEngine::standard().expect("standard tables are consistent")
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    records: Mutex<Vec<AssessmentRecord>>,
    reports: Mutex<Vec<(AssessmentId, ReportDocument)>>,
}

impl MemoryRepository {
    pub(super) fn records(&self) -> Vec<AssessmentRecord> {
        self.records.lock().expect("records mutex").clone()
    }

    pub(super) fn reports(&self) -> Vec<(AssessmentId, ReportDocument)> {
        self.reports.lock().expect("reports mutex").clone()
    }
}

impl AssessmentRepository for MemoryRepository {
    fn insert(&self, record: &AssessmentRecord) -> Result<(), RepositoryError> {
        self.records
            .lock()
            .expect("records mutex")
            .push(record.clone());
        Ok(())
    }

    fn store_report(
        &self,
        assessment_id: &AssessmentId,
        report: &ReportDocument,
    ) -> Result<(), RepositoryError> {
        self.reports
            .lock()
            .expect("reports mutex")
            .push((assessment_id.clone(), report.clone()));
        Ok(())
    }
}

pub(super) struct UnavailableRepository;

impl AssessmentRepository for UnavailableRepository {
    fn insert(&self, _record: &AssessmentRecord) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }

    fn store_report(
        &self,
        _assessment_id: &AssessmentId,
        _report: &ReportDocument,
    ) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("disk full".to_string()))
    }
}

#[derive(Default)]
pub(super) struct MemoryDispatcher {
    sent: Mutex<Vec<Notification>>,
}

impl MemoryDispatcher {
    pub(super) fn sent(&self) -> Vec<Notification> {
        self.sent.lock().expect("dispatcher mutex").clone()
    }
}

impl NotificationDispatcher for MemoryDispatcher {
    fn dispatch(&self, notification: &Notification) -> Result<(), NotificationError> {
        self.sent
            .lock()
            .expect("dispatcher mutex")
            .push(notification.clone());
        Ok(())
    }
}

pub(super) struct FailingDispatcher;

impl NotificationDispatcher for FailingDispatcher {
    fn dispatch(&self, _notification: &Notification) -> Result<(), NotificationError> {
        Err(NotificationError::Transport("relay refused connection".to_string()))
    }
}

pub(super) struct FailingRenderer;

impl ReportRenderer for FailingRenderer {
    fn render(&self, _input: &ReportInput<'_>) -> Result<ReportDocument, ReportError> {
        Err(ReportError::Format(std::fmt::Error))
    }
}

pub(super) fn service_with<R, N>(
    repository: Arc<R>,
    dispatcher: Arc<N>,
) -> Arc<AssessmentService<R, N>>
where
    R: AssessmentRepository + 'static,
    N: NotificationDispatcher + 'static,
{
    Arc::new(AssessmentService::new(
        engine(),
        repository,
        dispatcher,
        Box::new(TextReportRenderer),
    ))
}

pub(super) type MemoryService = AssessmentService<MemoryRepository, MemoryDispatcher>;

pub(super) fn build_service() -> (
    Arc<MemoryService>,
    Arc<MemoryRepository>,
    Arc<MemoryDispatcher>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let dispatcher = Arc::new(MemoryDispatcher::default());
    let service = service_with(repository.clone(), dispatcher.clone());
    (service, repository, dispatcher)
}

pub(super) async fn response_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("json body")
}
