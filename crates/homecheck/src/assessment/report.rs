use std::fmt::Write as _;

use mime::Mime;

use super::domain::{AssessmentId, AssessmentSubmission};
use super::questionnaire::QuestionDefinition;
use super::scoring::ScoreResult;

pub const REPORT_TITLE: &str = "Remote Home Check Assessment Report";

/// Everything a renderer needs to describe one processed assessment.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub assessment_id: &'a AssessmentId,
    pub submission: &'a AssessmentSubmission,
    pub scores: &'a ScoreResult,
    pub care_plan: &'a str,
    pub questions: &'a [QuestionDefinition],
}

/// Rendered report ready to be stored or attached to a notification.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub file_name: String,
    pub content_type: Mime,
    pub body: Vec<u8>,
}

impl ReportDocument {
    pub fn extension(&self) -> &str {
        self.file_name
            .rsplit_once('.')
            .map(|(_, extension)| extension)
            .unwrap_or("bin")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("unable to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Renders assessment reports; document formats live behind this seam.
pub trait ReportRenderer: Send + Sync {
    fn render(&self, input: &ReportInput<'_>) -> Result<ReportDocument, ReportError>;
}

/// Plain-text report layout.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextReportRenderer;

impl ReportRenderer for TextReportRenderer {
    fn render(&self, input: &ReportInput<'_>) -> Result<ReportDocument, ReportError> {
        let patient = &input.submission.patient;
        let scores = input.scores;
        let mut text = String::new();

        writeln!(text, "{REPORT_TITLE}")?;
        writeln!(text, "{}", "=".repeat(REPORT_TITLE.len()))?;
        writeln!(text)?;

        writeln!(text, "Patient: {}", patient.name.as_deref().unwrap_or("N/A"))?;
        writeln!(text, "Email: {}", patient.email)?;
        writeln!(
            text,
            "Age: {}",
            patient.age_label().as_deref().unwrap_or("N/A")
        )?;
        writeln!(text, "Assessment Date: {}", input.submission.timestamp)?;
        writeln!(
            text,
            "Previous Tier: {}",
            patient
                .previous_tier
                .as_ref()
                .map_or("N/A", |tier| tier.label())
        )?;
        writeln!(text)?;

        writeln!(text, "Assessment Scores")?;
        writeln!(
            text,
            "Physical Health Score: {:.1}/100",
            f64::from(scores.physical_score)
        )?;
        writeln!(
            text,
            "Mental Health Score: {:.1}/100",
            f64::from(scores.mental_score)
        )?;
        writeln!(text, "Insight Score: {:.1}/100", scores.insight_score)?;
        writeln!(text, "Tier: {}", scores.tier)?;
        writeln!(text)?;

        writeln!(text, "Assessment Responses")?;
        for question in input.questions {
            let answer = input
                .submission
                .responses
                .get(question.name)
                .map(String::as_str)
                .unwrap_or("Not answered");
            writeln!(text, "{}: {}", question.label, answer)?;
        }
        writeln!(text)?;

        writeln!(text, "Care Plan Suggestion")?;
        writeln!(text, "{}", input.care_plan)?;

        Ok(ReportDocument {
            file_name: format!("health_assessment_report_{}.txt", input.assessment_id),
            content_type: mime::TEXT_PLAIN_UTF_8,
            body: text.into_bytes(),
        })
    }
}
