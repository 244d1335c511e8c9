use homecheck::assessment::{
    AssessmentService, FileAssessmentRepository, OutboxDispatcher, ScoringEngine,
    TextReportRenderer, QUESTIONNAIRE,
};
use homecheck::config::{AppConfig, SmtpSettings};
use homecheck::error::AppError;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

pub(crate) type FileAssessmentService = AssessmentService<FileAssessmentRepository, OutboxDispatcher>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) smtp: SmtpSettings,
}

/// Wires the file-backed repository and outbox under the configured data directory.
pub(crate) fn build_assessment_service(
    config: &AppConfig,
) -> Result<Arc<FileAssessmentService>, AppError> {
    let engine = ScoringEngine::standard()?;
    let data_dir = &config.storage.data_dir;
    let repository = FileAssessmentRepository::new(data_dir, QUESTIONNAIRE)?;
    let dispatcher = OutboxDispatcher::new(data_dir.join("outbox"), config.smtp.clone());

    Ok(Arc::new(AssessmentService::new(
        engine,
        Arc::new(repository),
        Arc::new(dispatcher),
        Box::new(TextReportRenderer),
    )))
}
