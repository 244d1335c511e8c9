use crate::infra::build_assessment_service;
use clap::Args;
use homecheck::assessment::{
    AssessmentServiceError, IntakeGuard, ScoreResult, ScoringEngine, ValidationFailure,
    QUESTIONNAIRE,
};
use homecheck::config::AppConfig;
use homecheck::error::AppError;
use homecheck::telemetry;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON file holding an assessment payload (timestamp, patient, responses)
    #[arg(long)]
    pub(crate) file: PathBuf,
    /// Persist the assessment, store its report, and queue the patient notification
    #[arg(long)]
    pub(crate) submit: bool,
}

pub(crate) fn run_questions() -> Result<(), AppError> {
    println!("Remote home check questionnaire");
    for question in QUESTIONNAIRE {
        println!("\n{} ({})", question.label, question.name);
        for option in question.options {
            println!("  - {option}");
        }
    }
    Ok(())
}

pub(crate) fn run_score(args: ScoreArgs) -> Result<(), AppError> {
    let ScoreArgs { file, submit } = args;
    let raw = std::fs::read_to_string(&file)?;
    let payload: Value = serde_json::from_str(&raw)?;

    if submit {
        return submit_assessment(&payload);
    }

    let engine = ScoringEngine::standard()?;
    let submission = match IntakeGuard::new(engine.questions()).submission_from_payload(&payload) {
        Ok(submission) => submission,
        Err(failure) => return Err(report_rejection(failure)),
    };
    let scores = engine.score(&submission.responses);
    let care_plan = engine.advise(scores.tier, submission.patient.previous_tier.as_ref());

    println!("Assessment preview for {}", submission.patient.email);
    render_scores(&scores);
    println!("Care plan: {care_plan}");
    Ok(())
}

fn submit_assessment(payload: &Value) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let service = build_assessment_service(&config)?;

    let outcome = match service.process(payload) {
        Ok(outcome) => outcome,
        Err(AssessmentServiceError::Validation(failure)) => return Err(report_rejection(failure)),
        Err(err) => return Err(err.into()),
    };

    println!("Stored assessment {}", outcome.assessment_id);
    render_scores(&outcome.scores);
    println!("Care plan: {}", outcome.care_plan);
    if outcome.email_sent {
        println!("Notification queued in {}", config.storage.data_dir.join("outbox").display());
    } else {
        println!("Notification not queued (see logs)");
    }
    Ok(())
}

fn render_scores(scores: &ScoreResult) {
    println!(
        "- Physical {} ({:+}) | Mental {} ({:+})",
        scores.physical_score, scores.physical_delta, scores.mental_score, scores.mental_delta
    );
    println!("- Insight {:.1} -> tier {}", scores.insight_score, scores.tier);
}

fn report_rejection(failure: ValidationFailure) -> AppError {
    println!("Assessment rejected: {failure}");
    if let ValidationFailure::Invalid { violations } = &failure {
        for violation in violations {
            println!("  - {violation}");
        }
    }
    AssessmentServiceError::from(failure).into()
}
